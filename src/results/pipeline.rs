//! Stateless ranking transforms over sequences of [`Rankable`]s

use super::types::Rankable;
use crate::learn::LearningRegister;
use crate::objects::{Object, ObjectRef};
use crate::relevance::{score, score_single};
use std::cmp::Ordering;

/// Text rank at or below which a candidate is dropped
const MIN_TEXT_RANK: f64 = 10.0;

/// Text rank below which aliases are tried as well
const ALIAS_THRESHOLD: f64 = 90.0;

/// Wrap objects as rank 0 rankables
pub fn make_rankables<I>(items: I) -> impl Iterator<Item = Rankable>
where
    I: IntoIterator<Item = ObjectRef>,
{
    items.into_iter().map(Rankable::new)
}

fn text_score(text: &str, key: &str) -> f64 {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => score_single(text, ch),
        _ => score(text, key),
    }
}

/// Rank by text relevance of the display name, or of an alias when that is
/// better, dropping weak matches.
pub fn score_text<I>(rankables: I, key: &str) -> impl Iterator<Item = Rankable>
where
    I: IntoIterator<Item = Rankable>,
{
    let key = key.to_lowercase();
    rankables.into_iter().filter_map(move |mut rb| {
        rb.rank = 100.0 * text_score(&rb.display, &key);
        if rb.rank < ALIAS_THRESHOLD {
            let mut best_alias = None;
            for alias in &rb.aliases {
                // aliases rank a bit lower so the real name wins when close
                let alias_rank = 95.0 * text_score(alias, &key);
                if alias_rank > rb.rank {
                    rb.rank = alias_rank;
                    best_alias = Some(alias.clone());
                }
            }
            if let Some(alias) = best_alias {
                rb.display = alias;
            }
        }
        (rb.rank > MIN_TEXT_RANK).then_some(rb)
    })
}

/// Add the learned score of each object
pub fn bonus_objects(rankables: &mut [Rankable], register: &LearningRegister, key: &str) {
    for rb in rankables {
        rb.rank += register.get_score(rb.object(), key);
    }
}

/// Rank actions for `leaf` when nothing has been typed
pub fn score_actions(rankables: &mut [Rankable], register: &LearningRegister, leaf: &dyn Object) {
    for rb in rankables {
        let adjust = f64::from(rb.object.rank_adjust())
            + register.get_correlation_bonus(rb.object(), leaf);
        let learned = register.get_score(rb.object(), "");
        rb.rank = match adjust.partial_cmp(&0.0) {
            Some(Ordering::Greater) => 50.0 + adjust + learned / 2.0,
            Some(Ordering::Less) => -50.0 + adjust + learned,
            _ => learned,
        };
    }
}

/// Add learned score and intrinsic bias to text-ranked actions
pub fn bonus_actions(rankables: &mut [Rankable], register: &LearningRegister, key: &str) {
    for rb in rankables {
        rb.rank += register.get_score(rb.object(), key) + f64::from(rb.object.rank_adjust());
    }
}

/// Flat rank for sources with a fixed priority
pub fn add_fixed_rank(rankables: &mut [Rankable], fixed: f64) {
    for rb in rankables {
        rb.rank += fixed;
    }
}

/// Merge ranked lists best first.
///
/// Returns the best item and the full list sorted by descending rank; the
/// full list still contains the best item at its head. Equal ranks keep
/// their original order, earlier lists first.
pub fn merge_best_first<I>(lists: I) -> (Option<Rankable>, Vec<Rankable>)
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = Rankable>,
{
    let mut all: Vec<Rankable> = lists.into_iter().flatten().collect();
    all.sort_by(|a, b| b.rank.partial_cmp(&a.rank).unwrap_or(Ordering::Equal));
    (all.first().cloned(), all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::ObjectKind;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Item {
        name: &'static str,
        aliases: Vec<String>,
        adjust: i32,
    }

    impl Object for Item {
        fn key(&self) -> String {
            format!("item:{}", self.name)
        }

        fn display(&self) -> String {
            self.name.to_string()
        }

        fn kind(&self) -> ObjectKind {
            ObjectKind::Action
        }

        fn aliases(&self) -> Vec<String> {
            self.aliases.clone()
        }

        fn rank_adjust(&self) -> i32 {
            self.adjust
        }
    }

    fn item(name: &'static str) -> ObjectRef {
        Arc::new(Item {
            name,
            aliases: vec![],
            adjust: 0,
        })
    }

    fn action(name: &'static str, adjust: i32) -> ObjectRef {
        Arc::new(Item {
            name,
            aliases: vec![],
            adjust,
        })
    }

    fn ranked(name: &'static str, rank: f64) -> Rankable {
        Rankable::new(item(name)).with_rank(rank)
    }

    #[test]
    fn test_make_rankables() {
        let rbs: Vec<Rankable> = make_rankables(vec![item("a"), item("b")]).collect();
        assert_eq!(rbs.len(), 2);
        assert_eq!(rbs[0].display, "a");
        assert_eq!(rbs[1].rank, 0.0);
    }

    #[test]
    fn test_score_text_drops_weak_matches() {
        let rbs: Vec<Rankable> =
            score_text(make_rankables(vec![item("terminal"), item("editor")]), "term").collect();
        assert_eq!(rbs.len(), 1);
        assert_eq!(rbs[0].display, "terminal");
        assert!(rbs[0].rank >= 90.0);
    }

    #[test]
    fn test_score_text_single_char_fast_path() {
        let rbs: Vec<Rankable> = score_text(make_rankables(vec![item("Terminal")]), "T").collect();
        let expected = 100.0 * score_single("Terminal", 't');
        assert!((rbs[0].rank - expected).abs() < 1e-9);
    }

    #[test]
    fn test_score_text_uses_better_alias() {
        let obj: ObjectRef = Arc::new(Item {
            name: "org.gnome.Nautilus",
            aliases: vec!["Files".to_string()],
            adjust: 0,
        });
        let rbs: Vec<Rankable> = score_text(make_rankables(vec![obj]), "files").collect();
        assert_eq!(rbs.len(), 1);
        assert_eq!(rbs[0].display, "Files");
        assert!(rbs[0].rank <= 95.0);
        assert!(rbs[0].rank > 90.0);
    }

    #[test]
    fn test_score_text_keeps_name_when_good() {
        let obj: ObjectRef = Arc::new(Item {
            name: "files",
            aliases: vec!["Files".to_string()],
            adjust: 0,
        });
        let rbs: Vec<Rankable> = score_text(make_rankables(vec![obj]), "files").collect();
        assert_eq!(rbs[0].display, "files");
    }

    #[test]
    fn test_bonus_objects() {
        let mut register = LearningRegister::new();
        let obj = item("firefox");
        register.record_hit(obj.as_ref(), "");
        let mut rbs = vec![Rankable::new(obj).with_rank(10.0), ranked("other", 5.0)];
        bonus_objects(&mut rbs, &register, "");
        assert_eq!(rbs[0].rank, 35.0);
        assert_eq!(rbs[1].rank, 5.0);
    }

    #[test]
    fn test_score_actions() {
        let mut register = LearningRegister::new();
        let leaf = item("report.pdf");
        let open = action("open", 5);
        let plain = action("copy", 0);
        let trash = action("trash", -10);
        let reveal = action("reveal", 0);
        register.set_correlation(reveal.as_ref(), leaf.as_ref());
        register.record_hit(plain.as_ref(), "");

        let mut rbs: Vec<Rankable> = make_rankables(vec![open, plain, trash, reveal]).collect();
        score_actions(&mut rbs, &register, leaf.as_ref());

        assert_eq!(rbs[0].rank, 55.0);
        assert_eq!(rbs[1].rank, 25.0);
        assert_eq!(rbs[2].rank, -60.0);
        assert_eq!(rbs[3].rank, 100.0);
    }

    #[test]
    fn test_bonus_actions() {
        let register = LearningRegister::new();
        let mut rbs = vec![Rankable::new(action("trash", -10)).with_rank(95.0)];
        bonus_actions(&mut rbs, &register, "tr");
        assert_eq!(rbs[0].rank, 85.0);
    }

    #[test]
    fn test_add_fixed_rank() {
        let mut rbs = vec![ranked("a", 0.0), ranked("b", 1.0)];
        add_fixed_rank(&mut rbs, 80.0);
        assert_eq!(rbs[0].rank, 80.0);
        assert_eq!(rbs[1].rank, 81.0);
    }

    #[test]
    fn test_merge_best_first() {
        let lists = vec![
            vec![ranked("a", 10.0), ranked("b", 50.0)],
            vec![ranked("c", 90.0), ranked("d", 50.0)],
        ];
        let (best, all) = merge_best_first(lists);
        assert_eq!(best.unwrap().display, "c");
        let order: Vec<&str> = all.iter().map(|rb| rb.display.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "d", "a"]);
    }

    #[test]
    fn test_merge_best_first_empty() {
        let (best, all) = merge_best_first(Vec::<Vec<Rankable>>::new());
        assert!(best.is_none());
        assert!(all.is_empty());
    }
}

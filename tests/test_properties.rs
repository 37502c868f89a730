//! Property tests for evaluation laws that must hold for any input

use chrono::NaiveDate;
use proptest::prelude::*;
use tally::domain::network::{Ipv4Net, mask_for_prefix, prefix_from_mask};
use tally::parser::evaluate;
use tally::{Engine, EngineOptions, adjust_references};

fn engine() -> Engine {
    let now = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    Engine::with_options(EngineOptions::default().with_reference_time(now))
}

fn eval(expr: &str) -> f64 {
    evaluate(expr, None)
        .unwrap_or_else(|e| panic!("{expr:?} failed: {e}"))
        .as_f64()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

/// A line that always evaluates: a number, or arithmetic on earlier lines.
fn document_line(max_reference: usize) -> impl Strategy<Value = String> {
    prop_oneof![
        (1u32..1000).prop_map(|n| format!("{n} =")),
        (1u32..1000).prop_map(|n| format!("${n} =")),
        (1..=max_reference, 1u32..10).prop_map(|(r, k)| format!("\\{r} * {k} =")),
        Just("# note".to_string()),
        Just(String::new()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn percent_addition_scales_left_operand(a in -1.0e6f64..1.0e6, p in 0u32..500) {
        let plus = eval(&format!("({a}) + {p}%"));
        let minus = eval(&format!("({a}) - {p}%"));
        let p = f64::from(p);
        prop_assert!(close(plus, a * (1.0 + p / 100.0)), "{plus} vs {a} + {p}%");
        prop_assert!(close(minus, a * (1.0 - p / 100.0)), "{minus} vs {a} - {p}%");
    }

    #[test]
    fn bare_percent_is_a_fraction(a in 1u32..10_000, p in 0u32..500) {
        let product = eval(&format!("{a} * {p}%"));
        prop_assert!(close(product, f64::from(a) * f64::from(p) / 100.0));
    }

    #[test]
    fn mask_round_trips_through_prefix(prefix in 0u8..=32) {
        prop_assert_eq!(prefix_from_mask(mask_for_prefix(prefix)), Ok(prefix));
    }

    #[test]
    fn every_block_contains_its_own_range(a in any::<u32>(), prefix in 0u8..=32) {
        let net = Ipv4Net::new(a.into(), prefix).unwrap();
        let (first, last) = net.host_range();
        prop_assert!(net.contains(first));
        prop_assert!(net.contains(last));
        prop_assert!(net.contains(net.address()));
    }

    #[test]
    fn rendering_is_idempotent(lines in proptest::collection::vec(document_line(1), 1..8)) {
        let engine = engine();
        let text = lines.join("\n");
        let once = engine.render(&text);
        prop_assert_eq!(engine.render(&once), once);
    }

    #[test]
    fn insert_keeps_references_pointing_at_the_same_lines(
        count in 2usize..8,
        at in 0usize..8,
        seed in 1u32..100,
    ) {
        // "n =", then every later line references its predecessor
        let mut old: Vec<String> = vec![format!("{seed} =")];
        for line in 1..count {
            old.push(format!("\\{line} + 1 ="));
        }
        let at = at.min(count);
        let mut new = old.clone();
        new.insert(at, "1000 =".to_string());

        let old_text = old.join("\n");
        let adjusted = adjust_references(&old_text, &new.join("\n"));
        let adjusted: Vec<&str> = adjusted.split('\n').collect();

        let engine = engine();
        let before: Vec<Option<f64>> =
            engine.evaluate_document(&old).into_iter().map(|l| l.value).collect();
        let mut after: Vec<Option<f64>> =
            engine.evaluate_document(&adjusted).into_iter().map(|l| l.value).collect();
        after.remove(at);
        prop_assert_eq!(before, after);
    }

    #[test]
    fn delete_keeps_surviving_references_and_leaves_dangling_ones(
        count in 3usize..8,
        at in 0usize..8,
        seed in 1u32..100,
    ) {
        // "n =", a block referencing it, a line referencing the block's last
        // line, then a line referencing the line that gets deleted
        let at = 1 + at % (count - 2);
        let mut old: Vec<String> = vec![format!("{seed} =")];
        for i in 1..count {
            old.push(format!("\\1 + {i} ="));
        }
        old.push(format!("\\{count} * 2 ="));
        let dangling = format!("\\{} + 0 =", at + 1);
        old.push(dangling.clone());
        let mut new = old.clone();
        new.remove(at);

        let adjusted = adjust_references(&old.join("\n"), &new.join("\n"));
        let adjusted: Vec<&str> = adjusted.split('\n').collect();
        prop_assert_eq!(adjusted.len(), new.len());
        prop_assert_eq!(adjusted[adjusted.len() - 1], dangling);

        let engine = engine();
        let mut before: Vec<Option<f64>> =
            engine.evaluate_document(&old).into_iter().map(|l| l.value).collect();
        before.remove(at);
        before.pop();
        let mut after: Vec<Option<f64>> =
            engine.evaluate_document(&adjusted).into_iter().map(|l| l.value).collect();
        after.pop();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn currency_follows_references(amounts in proptest::collection::vec(1u32..1000, 1..6)) {
        let mut lines: Vec<String> = vec!["$1 =".to_string()];
        for (i, amount) in amounts.iter().enumerate() {
            lines.push(format!("\\{} + {amount} =", i + 1));
        }
        let evaluated = engine().evaluate_document(&lines);
        prop_assert!(evaluated.iter().all(|l| l.is_currency));
        prop_assert!(evaluated.iter().all(|l| l.output.contains('$')));
    }
}

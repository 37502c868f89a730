//! End-to-end document scenarios through the public API

use chrono::NaiveDate;
use rstest::rstest;
use tally::{Engine, EngineOptions, GrammarSet, adjust_references, has_result, strip_result};

fn engine() -> Engine {
    let now = NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    Engine::with_options(EngineOptions::default().with_reference_time(now))
}

fn outputs(lines: &[&str]) -> Vec<String> {
    engine()
        .evaluate_document(lines)
        .into_iter()
        .map(|line| line.output)
        .collect()
}

#[rstest]
#[case(&["2 + 3 ="], &["2 + 3 = 5"])]
#[case(&["100 =", "\\1 * 2 ="], &["100 = 100", "\\1 * 2 = 200"])]
#[case(&["$100 - 20% ="], &["$100 - 20% = $80.00"])]
#[case(&["\\1 + 5 ="], &["\\1 + 5 = ERR"])]
fn test_basic_scenarios(#[case] input: &[&str], #[case] expected: &[&str]) {
    assert_eq!(outputs(input), expected);
}

#[test]
fn test_cidr_scenario() {
    let records = engine().records(&["10.100.0.0/24 ="]);
    let output = &records[0].output;
    assert!(output.contains("Network: 10.100.0.0/24"), "{output}");
    assert!(output.contains("Hosts: 254"), "{output}");
    assert!(output.contains("Mask: 255.255.255.0"), "{output}");
}

#[test]
fn test_renumbering_scenario() {
    let old = ["100 =", "50 =", "\\2 + 5 ="].join("\n");
    let new = ["100 =", "", "50 =", "\\2 + 5 ="].join("\n");
    let adjusted = adjust_references(&old, &new);
    let lines: Vec<&str> = adjusted.split('\n').collect();
    assert_eq!(lines, ["100 =", "", "50 =", "\\3 + 5 ="]);

    let evaluated = outputs(&lines);
    assert_eq!(evaluated[3], "\\3 + 5 = 55");
}

#[rstest]
#[case("3 + 4 = 7", "3 + 4 =")]
#[case("3 + 4 = 7 # note", "3 + 4 = # note")]
#[case("3 + 4 =", "3 + 4 =")]
#[case("no separator", "no separator")]
#[case("5 >= 3 = true", "5 >= 3 =")]
fn test_strip_result(#[case] line: &str, #[case] expected: &str) {
    assert_eq!(strip_result(line), expected);
}

#[rstest]
#[case("3 + 4 = 7", true)]
#[case("3 + 4 = 7 # note", true)]
#[case("3 + 4 =", false)]
#[case("3 + 4 = # note", false)]
#[case("> Hosts: 254", false)]
fn test_has_result(#[case] line: &str, #[case] expected: bool) {
    assert_eq!(has_result(line), expected);
}

#[test]
fn test_budget_document() {
    let engine = Engine::with_options(EngineOptions::default().with_grammars(GrammarSet::Extended));
    let text = "\
# monthly budget
$1,450 =
$320*1.1 =
\\2 + \\3 =
\\4 - 10% = # after discount
15% of \\4 =
\\4 > $1,800 =
";
    assert_eq!(
        engine.render(text),
        "\
# monthly budget
$1,450 = $1,450.00
$320 * 1.1 = $352.00
\\2 + \\3 = $1,802.00
\\4 - 10% = $1,621.80 # after discount
15% of \\4 = $270.30
\\4 > $1,800 = true
"
    );
}

// Diagnostics: codes, labels, help and rendered reports.

use miette::Diagnostic;
use strsum::{add_string, ErrorType, SumError};

fn labels(err: &SumError) -> Vec<(usize, usize, Option<String>)> {
    err.labels()
        .map(|labels| {
            labels
                .map(|l| (l.offset(), l.len(), l.label().map(str::to_string)))
                .collect()
        })
        .unwrap_or_default()
}

fn render(err: SumError) -> String {
    format!("{:?}", miette::Report::new(err))
}

#[test]
fn error_codes_are_stable() {
    assert_eq!(ErrorType::InvalidInput.code(), "strsum::invalid_input");
    assert_eq!(ErrorType::NegativeValue.code(), "strsum::negative_value");

    let err = add_string("1,a").unwrap_err();
    assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("strsum::invalid_input"));
}

#[test]
fn invalid_token_is_labeled() {
    let err = add_string("1, abc ,3").unwrap_err();
    assert_eq!(labels(&err), vec![(3, 3, Some("invalid here".to_string()))]);
    let help = err.help().map(|h| h.to_string()).unwrap();
    assert!(help.contains("`abc` is not an integer"));
}

#[test]
fn out_of_range_token_has_range_help() {
    let err = add_string("99999999999999999999").unwrap_err();
    let help = err.help().map(|h| h.to_string()).unwrap();
    assert!(help.contains("does not fit"));
}

#[test]
fn invalid_delimiter_is_labeled() {
    let err = add_string("//a b\n1").unwrap_err();
    assert_eq!(labels(&err), vec![(2, 3, Some("invalid here".to_string()))]);
}

#[test]
fn every_negative_is_labeled() {
    let err = add_string("1,-1,2,-30").unwrap_err();
    assert_eq!(
        labels(&err),
        vec![
            (2, 2, Some("-1 is negative".to_string())),
            (7, 3, Some("-30 is negative".to_string())),
        ]
    );
    assert!(err.help().is_some());
}

#[test]
fn report_mentions_message_and_code() {
    let rendered = render(add_string("1,-1,2,-3,4").unwrap_err());
    assert!(rendered.contains("Negative numbers not allowed: -1, -3"));
    assert!(rendered.contains("strsum::negative_value"));
}

#[test]
fn report_uses_renamed_source() {
    let err = add_string("1,x").unwrap_err().with_source_name("numbers.txt");
    assert!(render(err).contains("numbers.txt"));
}

#[test]
fn errors_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<SumError>();
}

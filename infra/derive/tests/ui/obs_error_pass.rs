use obs_derive::obs_error;
use std::borrow::Cow;

#[obs_error]
pub enum DemoError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse {
        #[source]
        source: std::num::ParseIntError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Missing option {option}")]
    Missing { option: &'static str },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, DemoError> {
    raw.parse::<u32>().context("Reading DEFAULT_PAGINATION")
}

fn main() {
    let err = parse("five").unwrap_err();
    assert_eq!(err.context_note(), Some("Reading DEFAULT_PAGINATION"));

    let plain: DemoError = "boom".into();
    assert!(plain.context_note().is_none());

    let missing = DemoError::Missing { option: "SITENAME" };
    assert!(missing.context_note().is_none());
}

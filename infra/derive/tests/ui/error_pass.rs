use formwork_derive::formwork_error;
use std::borrow::Cow;

#[formwork_error]
pub enum DemoError {
    #[error("Parse error{}: {source}", format_context(.context))]
    Parse {
        #[source]
        source: std::num::ParseIntError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Reserved name{}: {name}", format_context(.context))]
    Reserved { name: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<i64, DemoError> {
    raw.parse::<i64>().context("parsing rating")
}

fn main() {
    assert!(parse("10").is_ok());

    let err = parse("ten").unwrap_err();
    assert!(err.to_string().starts_with("Parse error (parsing rating)"));

    let internal: DemoError = "boom".into();
    assert_eq!(internal.to_string(), "Internal error: boom");

    let reserved: Result<(), DemoError> =
        Err(DemoError::Reserved { name: "model".into(), context: None });
    let reserved = reserved.context("album").unwrap_err();
    assert_eq!(reserved.to_string(), "Reserved name (album): model");
}

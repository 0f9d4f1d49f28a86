use std::error::Error as _;
use std::io;

use tokenz::{Result, TokenzError};

#[test]
fn test_error_display() {
    let err = TokenzError::ModelNotFound("gpt-7".to_string());
    assert!(err.to_string().contains("gpt-7"));
}

#[test]
fn test_invalid_color_mentions_expected_format() {
    let err = TokenzError::InvalidColor("#12".to_string());
    let message = err.to_string();
    assert!(message.contains("#12"));
    assert!(message.contains("#RRGGBB"));
}

#[test]
fn test_io_error_keeps_path_and_source() {
    let err = TokenzError::io(
        "/tmp/missing.txt",
        io::Error::new(io::ErrorKind::NotFound, "no such file"),
    );
    assert!(err.to_string().contains("missing.txt"));
    assert!(err.source().is_some());
}

#[test]
fn test_json_error_converts() {
    fn parse() -> Result<serde_json::Value> {
        Ok(serde_json::from_str("{not json")?)
    }
    assert!(matches!(parse(), Err(TokenzError::Json(_))));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(TokenzError::Cancelled)
    }
    assert!(returns_error().is_err());
}

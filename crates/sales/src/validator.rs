use restock_core::{ItemVector, ValidationError};

/// Token separator of an operator-entered sales line (`10,20,30,40,50,60`).
pub const SALES_SEPARATOR: char = ',';

/// Validate raw tokens into a sales row of exactly `expected_len` values.
///
/// Tokens are checked for integer syntax first, in order; the count is only
/// checked once every token parsed. A line that is both miscounted and
/// non-numeric therefore reports `NotInteger` for its first bad token.
pub fn validate<S: AsRef<str>>(
    raw: &[S],
    expected_len: usize,
) -> Result<ItemVector, ValidationError> {
    let mut values = Vec::with_capacity(raw.len());
    for (position, token) in raw.iter().enumerate() {
        let token = token.as_ref();
        let value = token
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::NotInteger {
                position,
                token: token.to_string(),
            })?;
        values.push(value);
    }

    if values.len() != expected_len {
        return Err(ValidationError::WrongCount {
            expected: expected_len,
            actual: values.len(),
        });
    }

    Ok(ItemVector::new(values))
}

/// Split an operator line on [`SALES_SEPARATOR`] and validate the tokens.
///
/// Surrounding whitespace (including the trailing newline from a terminal) is
/// ignored per token.
pub fn parse_sales_line(line: &str, expected_len: usize) -> Result<ItemVector, ValidationError> {
    let tokens: Vec<&str> = line.trim().split(SALES_SEPARATOR).collect();
    validate(&tokens, expected_len)
}

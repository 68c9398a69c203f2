//! Newline-delimited JSON streams

use std::io::{BufRead, BufReader, Read};

use crate::domain::ports::MessageCallback;
use crate::error::EdgeResult;

/// Decode each non-empty line of `reader` and hand it to `on_message`
///
/// Stops at the first decode or callback error.
pub fn for_each_message<R: Read>(reader: R, on_message: &mut MessageCallback<'_>) -> EdgeResult<()> {
    for line in BufReader::new(reader).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        on_message(serde_json::from_str(line)?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdgeError;

    #[test]
    fn skips_blank_lines() {
        let input = "{\"type\":\"a\"}\n\n  \n{\"type\":\"b\"}\n";
        let mut seen = Vec::new();
        for_each_message(input.as_bytes(), &mut |v| {
            seen.push(v["type"].as_str().unwrap_or_default().to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn callback_error_stops_stream() {
        let input = "{\"n\":1}\n{\"n\":2}\n";
        let mut count = 0;
        let result = for_each_message(input.as_bytes(), &mut |_| {
            count += 1;
            Err(EdgeError::Watch("stop".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(count, 1);
    }

    #[test]
    fn bad_json_is_an_error() {
        let result = for_each_message("not json\n".as_bytes(), &mut |_| Ok(()));
        assert_eq!(result.unwrap_err().kind(), "json");
    }
}

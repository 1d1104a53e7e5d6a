use std::borrow::Cow;

use crate::error::Error;

/// Resolve predefined entities and character references.
///
/// Returns the input slice untouched when there is nothing to resolve.
pub(crate) fn parse_entities(content: &str) -> Result<Cow<str>, Error> {
    if !content.contains('&') {
        return Ok(Cow::Borrowed(content));
    }
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '&' {
            result.push(c);
            continue;
        }
        let mut entity = String::new();
        let mut is_complete = false;
        for c in chars.by_ref() {
            if c == ';' {
                is_complete = true;
                break;
            }
            entity.push(c);
        }
        if !is_complete {
            return Err(Error::UnclosedEntity(entity));
        }
        match entity.as_str() {
            "amp" => result.push('&'),
            "apos" => result.push('\''),
            "gt" => result.push('>'),
            "lt" => result.push('<'),
            "quot" => result.push('"'),
            _ => result.push(parse_char_reference(&entity)?),
        }
    }
    Ok(Cow::Owned(result))
}

fn parse_char_reference(entity: &str) -> Result<char, Error> {
    let code = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(decimal) = entity.strip_prefix('#') {
        decimal.parse::<u32>().ok()
    } else {
        None
    };
    code.and_then(char::from_u32)
        .ok_or_else(|| Error::InvalidEntity(entity.to_string()))
}

/// Escape text content. Only `&`, `<` and `>` need escaping in text.
pub(crate) fn serialize_text(content: &str) -> Cow<str> {
    escape(content, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        _ => None,
    })
}

/// Escape an attribute value for use between double quotes.
pub(crate) fn serialize_attribute(content: &str) -> Cow<str> {
    escape(content, |c| match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '"' => Some("&quot;"),
        '\n' => Some("&#10;"),
        '\r' => Some("&#13;"),
        '\t' => Some("&#9;"),
        _ => None,
    })
}

fn escape(content: &str, replacement: impl Fn(char) -> Option<&'static str>) -> Cow<str> {
    if !content.chars().any(|c| replacement(c).is_some()) {
        return Cow::Borrowed(content);
    }
    let mut result = String::with_capacity(content.len() + 8);
    for c in content.chars() {
        match replacement(c) {
            Some(escaped) => result.push_str(escaped),
            None => result.push(c),
        }
    }
    Cow::Owned(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(parse_entities("A &amp; B").unwrap(), "A & B");
    }

    #[test]
    fn test_parse_multiple() {
        assert_eq!(
            parse_entities("&amp;&apos;&gt;&lt;&quot;").unwrap(),
            "&'><\""
        );
    }

    #[test]
    fn test_parse_char_references() {
        assert_eq!(parse_entities("&#233;t&#xE9;").unwrap(), "été");
    }

    #[test]
    fn test_parse_unknown_entity() {
        let err = parse_entities("&unknown;");
        if let Err(Error::InvalidEntity(entity)) = err {
            assert_eq!(entity, "unknown");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_parse_invalid_char_reference() {
        assert!(matches!(
            parse_entities("&#xD800;"),
            Err(Error::InvalidEntity(_))
        ));
    }

    #[test]
    fn test_parse_unfinished_entity() {
        let err = parse_entities("&amp");
        if let Err(Error::UnclosedEntity(entity)) = err {
            assert_eq!(entity, "amp");
        } else {
            unreachable!();
        }
    }

    #[test]
    fn test_parse_no_entities() {
        let text = "hello";
        let result = parse_entities(text).unwrap();
        // this is the same slice
        assert!(std::ptr::eq(text, result.as_ref()));
    }

    #[test]
    fn test_serialize_text() {
        assert_eq!(serialize_text("A & B < C"), "A &amp; B &lt; C");
        assert_eq!(serialize_text("\"quoted\""), "\"quoted\"");
    }

    #[test]
    fn test_serialize_attribute() {
        assert_eq!(serialize_attribute("say \"hi\" & go"), "say &quot;hi&quot; &amp; go");
    }

    #[test]
    fn test_serialize_no_entities() {
        let text = "hello";
        let result = serialize_text(text);
        assert!(std::ptr::eq(text, result.as_ref()));
    }
}

//! Scanners for the two header grammars the pipeline reads:
//! `Display Name <address>` in `From`, and `<url>, <url>` in `List-Unsubscribe`.

/// A parsed `From` value. Both fields borrow from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sender<'a> {
    pub display_name: &'a str,
    pub email: &'a str,
}

/// Parse `Display Name <address>`.
///
/// The display name is the trimmed text before the first `<`; the address is
/// the text up to the next `>`, taken verbatim. Returns `None` when either
/// bracket is missing.
pub fn parse_sender(value: &str) -> Option<Sender<'_>> {
    enum State {
        Name,
        Address { open: usize },
    }

    let mut state = State::Name;
    for (i, c) in value.char_indices() {
        state = match (state, c) {
            (State::Name, '<') => State::Address { open: i },
            (State::Address { open }, '>') => {
                return Some(Sender {
                    display_name: value[..open].trim(),
                    email: &value[open + 1..i],
                });
            }
            (s, _) => s,
        };
    }
    None
}

/// Every link bracketed as `<http...>`, in order of appearance.
///
/// A link runs from `<http` to the next `>`, so a `<` inside the URL is kept.
/// Scanning stops at the first unterminated link. Unbracketed URLs are not
/// recognised.
pub fn bracketed_http_links(value: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut rest = value;

    while let Some(open) = rest.find("<http") {
        let token = &rest[open + 1..];
        let Some(close) = token.find('>') else {
            break;
        };
        links.push(token[..close].to_string());
        rest = &token[close + 1..];
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_with_display_name() {
        let s = parse_sender("Coursera <no-reply@t.mail.coursera.org>").unwrap();
        assert_eq!(s.display_name, "Coursera");
        assert_eq!(s.email, "no-reply@t.mail.coursera.org");
    }

    #[test]
    fn sender_without_display_name() {
        let s = parse_sender("<bare@example.com>").unwrap();
        assert_eq!(s.display_name, "");
        assert_eq!(s.email, "bare@example.com");
    }

    #[test]
    fn sender_keeps_quotes_and_case() {
        let s = parse_sender("\"ACME, Inc.\"  <News@ACME.com>").unwrap();
        assert_eq!(s.display_name, "\"ACME, Inc.\"");
        assert_eq!(s.email, "News@ACME.com");
    }

    #[test]
    fn sender_needs_both_brackets() {
        assert_eq!(parse_sender("plain@example.com"), None);
        assert_eq!(parse_sender("Name <unterminated@example.com"), None);
        assert_eq!(parse_sender("Name > <"), None);
        assert_eq!(parse_sender(""), None);
    }

    #[test]
    fn links_in_order() {
        let links = bracketed_http_links(
            "<https://a.example/u?id=1>, <mailto:u@a.example>,<http://b.example/u>",
        );
        assert_eq!(links, vec!["https://a.example/u?id=1", "http://b.example/u"]);
    }

    #[test]
    fn links_whitespace_separated() {
        let links = bracketed_http_links("<http://one> <http://two>");
        assert_eq!(links, vec!["http://one", "http://two"]);
    }

    #[test]
    fn links_ignore_unbracketed_and_unterminated() {
        assert!(bracketed_http_links("http://plain.example/u").is_empty());
        assert!(bracketed_http_links("<http://never-closed").is_empty());
        assert_eq!(bracketed_http_links("<a <http://x>"), vec!["http://x"]);
    }

    #[test]
    fn links_keep_inner_angle_bracket() {
        assert_eq!(
            bracketed_http_links("<http://a.example/u?x=<1>>, <http://b.example>"),
            vec!["http://a.example/u?x=<1", "http://b.example"]
        );
    }
}

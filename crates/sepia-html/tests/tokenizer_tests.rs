//! Integration tests for the HTML tokenizer.

use sepia_html::{Attribute, HTMLTokenizer, Token};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

/// Helper to collect consecutive character tokens into a string
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(
        tokens,
        vec![
            Token::Doctype {
                name: Some("html".to_string())
            },
            Token::EndOfFile
        ]
    );
}

#[test]
fn test_start_tag_with_attributes() {
    let tokens = tokenize(r#"<DIV Class="a b" id=main hidden>"#);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert_eq!(
                attributes,
                &vec![
                    Attribute::new("class".to_string(), "a b".to_string()),
                    Attribute::new("id".to_string(), "main".to_string()),
                    Attribute::new("hidden".to_string(), String::new()),
                ]
            );
        }
        other => panic!("Expected StartTag, got {other:?}"),
    }
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let tokens = tokenize(r#"<p style="color:red" style="color:blue">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].value, "color:red");
        }
        other => panic!("Expected StartTag, got {other:?}"),
    }
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag { name, self_closing: true, .. } if name == "br"
    ));
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</span>");
    assert_eq!(
        tokens[0],
        Token::EndTag {
            name: "span".to_string()
        }
    );
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -->x");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: " hi ".to_string()
        }
    );
    assert_eq!(tokens[1], Token::Character { data: 'x' });
}

#[test]
fn test_style_content_is_raw_text() {
    let tokens = tokenize("<style>a > b { color: red } &amp;</style>");
    assert_eq!(text_of(&tokens), "a > b { color: red } &amp;");
    assert_eq!(
        tokens[tokens.len() - 2],
        Token::EndTag {
            name: "style".to_string()
        }
    );
}

#[test]
fn test_raw_text_ignores_other_end_tags() {
    let tokens = tokenize("<script>if (a</b) {}</script>");
    assert_eq!(text_of(&tokens), "if (a</b) {}");
}

#[test]
fn test_title_decodes_references() {
    let tokens = tokenize("<title>A &amp; B <i></title>");
    assert_eq!(text_of(&tokens), "A & B <i>");
}

#[test]
fn test_character_references_in_data_and_attributes() {
    let tokens = tokenize(r#"<a title="x &lt; y">&#65;&#x42;&copy;</a>"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => assert_eq!(attributes[0].value, "x < y"),
        other => panic!("Expected StartTag, got {other:?}"),
    }
    assert_eq!(text_of(&tokens), "AB\u{00A9}");
}

#[test]
fn test_unknown_reference_is_literal() {
    let tokens = tokenize("&bogus; &");
    assert_eq!(text_of(&tokens), "&bogus; &");
}

#[test]
fn test_lone_less_than_is_text() {
    let tokens = tokenize("1 < 2");
    assert_eq!(text_of(&tokens), "1 < 2");
}

#[test]
fn test_truncated_tag_at_eof_is_dropped() {
    let tokens = tokenize("ok<div class=");
    assert_eq!(text_of(&tokens), "ok");
    assert!(matches!(tokens.last(), Some(Token::EndOfFile)));
}

use super::*;

fn texts(line: &str) -> Vec<String> {
    tokenize(line)
        .unwrap()
        .into_iter()
        .map(|t| t.text)
        .collect()
}

#[test]
fn test_plain_words() {
    assert_eq!(texts("  move (2,4)   7 "), vec!["move", "(2,4)", "7"]);
    assert!(tokenize("   ").unwrap().is_empty());
}

#[test]
fn test_quoted_label_keeps_spaces() {
    let tokens = tokenize(r#"line "print('Hello, World')" 2"#).unwrap();
    assert_eq!(tokens[1], Token::quoted("print('Hello, World')"));
    assert_eq!(tokens[2], Token::word("2"));
}

#[test]
fn test_escapes() {
    assert_eq!(
        texts(r#"l "say \"hi\" \\ \n""#),
        vec!["l", r#"say "hi" \ \n"#]
    );
}

#[test]
fn test_empty_quotes() {
    assert_eq!(tokenize(r#"c """#).unwrap()[1], Token::quoted(""));
}

#[test]
fn test_unterminated_quote() {
    assert!(matches!(
        tokenize(r#"line "oops"#),
        Err(CliError::UnterminatedQuote)
    ));
}

#[test]
fn test_is_integer() {
    assert!(Token::word("12").is_integer());
    assert!(!Token::quoted("12").is_integer());
    assert!(!Token::word("1a").is_integer());
    assert!(!Token::word("").is_integer());
}

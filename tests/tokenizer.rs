use wikitext_tokenizer::{tokenize, tokenize_with_config, Token, TokenizerConfig};

fn init() {
    let _ = env_logger::try_init();
}

fn text(s: &str) -> Token {
    Token::Text(s.to_string())
}

#[test]
fn plain_text_is_passed_through() {
    init();
    assert_eq!(tokenize("foo"), vec![text("foo")]);
}

#[test]
fn simple_template() {
    init();
    assert_eq!(
        tokenize("{{foo}}"),
        vec![Token::TemplateOpen, text("foo"), Token::TemplateClose]
    );
}

#[test]
fn template_with_named_and_positional_params() {
    init();
    assert_eq!(
        tokenize("{{foo|bar=baz|qux}}"),
        vec![
            Token::TemplateOpen,
            text("foo"),
            Token::TemplateParamSeparator,
            text("bar"),
            Token::TemplateParamEquals,
            text("baz"),
            Token::TemplateParamSeparator,
            text("qux"),
            Token::TemplateClose,
        ]
    );
}

#[test]
fn heading_with_trailing_newline() {
    init();
    assert_eq!(
        tokenize("== Title ==\n"),
        vec![
            Token::HeadingStart { level: 2 },
            text(" Title "),
            Token::HeadingEnd,
            text("\n"),
        ]
    );
}

#[test]
fn heading_with_longer_closing_run() {
    init();
    // The opening run is level 3; nothing trails, so the closing run matches
    // exactly and no stray `=` leaks into or after the title.
    assert_eq!(
        tokenize("=== x ==="),
        vec![
            Token::HeadingStart { level: 3 },
            text(" x "),
            Token::HeadingEnd,
        ]
    );
}

#[test]
fn heading_closing_run_longer_than_opening() {
    init();
    // Opening is level 2; the closing run is longer, so the surplus `=`
    // becomes literal text inside the title rather than extending the level.
    assert_eq!(
        tokenize("== x ===="),
        vec![
            Token::HeadingStart { level: 2 },
            text(" x =="),
            Token::HeadingEnd,
        ]
    );
}

#[test]
fn named_html_entity() {
    init();
    assert_eq!(
        tokenize("&amp;"),
        vec![Token::HTMLEntityStart, text("amp"), Token::HTMLEntityEnd]
    );
}

#[test]
fn hexadecimal_numeric_entity() {
    init();
    assert_eq!(
        tokenize("&#x41;"),
        vec![
            Token::HTMLEntityStart,
            Token::HTMLEntityNumeric,
            Token::HTMLEntityHex { char: 'x' },
            text("41"),
            Token::HTMLEntityEnd,
        ]
    );
}

#[test]
fn decimal_numeric_entity() {
    init();
    assert_eq!(
        tokenize("&#65;"),
        vec![
            Token::HTMLEntityStart,
            Token::HTMLEntityNumeric,
            text("65"),
            Token::HTMLEntityEnd,
        ]
    );
}

#[test]
fn unterminated_template_falls_back_to_literal_text() {
    init();
    assert_eq!(tokenize("{{foo"), vec![text("{{foo")]);
}

#[test]
fn template_name_with_interior_newline_falls_back_to_literal_text() {
    init();
    assert_eq!(tokenize("{{foo\nbar}}"), vec![text("{{foo\nbar}}")]);
}

#[test]
fn unknown_named_entity_falls_back_to_literal_text() {
    init();
    assert_eq!(tokenize("&notareal;"), vec![text("&notareal;")]);
}

#[test]
fn nested_templates() {
    init();
    assert_eq!(
        tokenize("{{foo|{{bar}}}}"),
        vec![
            Token::TemplateOpen,
            text("foo"),
            Token::TemplateParamSeparator,
            Token::TemplateOpen,
            text("bar"),
            Token::TemplateClose,
            Token::TemplateClose,
        ]
    );
}

#[test]
fn headings_do_not_nest() {
    init();
    // The inner `==` is not at line-start (GL_HEADING is already set by the
    // outer heading), so it is consumed as ordinary title text.
    let tokens = tokenize("== a == b ==\n");
    let starts = tokens
        .iter()
        .filter(|t| matches!(t, Token::HeadingStart { .. }))
        .count();
    assert_eq!(starts, 1);
}

#[test]
fn idempotent_fallback_for_plain_runs() {
    init();
    let input = "plain text with no markup at all";
    assert_eq!(tokenize(input), vec![text(input)]);
}

/// Renders a token stream back to its canonical literal wikicode, the way
/// P2 (text coverage) defines reproducing the original string: every
/// `Text` token's string, plus the canonical rendering of each structural
/// token around it.
fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut heading_levels = Vec::new();
    for token in tokens {
        match token {
            Token::Text(s) => out.push_str(s),
            Token::TemplateOpen => out.push_str("{{"),
            Token::TemplateParamSeparator => out.push('|'),
            Token::TemplateParamEquals => out.push('='),
            Token::TemplateClose => out.push_str("}}"),
            Token::HeadingStart { level } => {
                out.push_str(&"=".repeat(*level as usize));
                heading_levels.push(*level);
            }
            Token::HeadingEnd => {
                let level = heading_levels.pop().expect("HeadingEnd without a matching HeadingStart");
                out.push_str(&"=".repeat(level as usize));
            }
            Token::HTMLEntityStart => out.push('&'),
            Token::HTMLEntityNumeric => out.push('#'),
            Token::HTMLEntityHex { char } => out.push(*char),
            Token::HTMLEntityEnd => out.push(';'),
        }
    }
    out
}

#[test]
fn text_coverage_round_trips_markup() {
    init();
    for input in [
        "{{foo|bar=baz|qux}}",
        "== Title ==\n",
        "=== x ===",
        "== x ====",
        "&amp;",
        "&#65;",
        "&#x41;",
        "{{foo|{{bar}}}}",
        "foo {{bar}} baz == h ==\n &amp; tail",
        "== a == b ==\n",
    ] {
        let tokens = tokenize(input);
        assert_eq!(render(&tokens), input, "input: {input:?}, tokens: {tokens:?}");
    }
}

#[test]
fn no_adjacent_text_tokens() {
    init();
    let tokens = tokenize("foo {{bar}} baz == h ==\n &amp; tail");
    for pair in tokens.windows(2) {
        assert!(!matches!((&pair[0], &pair[1]), (Token::Text(_), Token::Text(_))));
    }
}

#[test]
fn balanced_template_and_entity_pairs() {
    init();
    let tokens = tokenize("{{a|{{b}}}} &amp; {{c}}");
    let mut depth = 0i32;
    for token in &tokens {
        match token {
            Token::TemplateOpen => depth += 1,
            Token::TemplateClose => depth -= 1,
            _ => {}
        }
        assert!(depth >= 0);
    }
    assert_eq!(depth, 0);

    let starts = tokens.iter().filter(|t| matches!(t, Token::HTMLEntityStart)).count();
    let ends = tokens.iter().filter(|t| matches!(t, Token::HTMLEntityEnd)).count();
    assert_eq!(starts, ends);
}

#[test]
fn heading_level_is_always_in_range() {
    init();
    for level in 1..=8 {
        let marker = "=".repeat(level);
        let input = format!("{marker} x {marker}\n");
        for token in tokenize(&input) {
            if let Token::HeadingStart { level } = token {
                assert!((1..=6).contains(&level));
            }
        }
    }
}

#[test]
fn max_depth_degrades_pathological_nesting_to_text() {
    init();
    let config = TokenizerConfig { max_depth: 4 };
    let input = "{{".repeat(20) + &"}}".repeat(20);
    // Must not panic or recurse unboundedly; depth is bounded by config.
    let tokens = tokenize_with_config(&input, &config);
    assert!(!tokens.is_empty());
}

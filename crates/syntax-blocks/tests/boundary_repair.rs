use syntax_blocks::{Language, LanguageParser, ParserConfig, DEFAULT_MIN_BLOCK_COUNT};

fn statements(count: usize) -> String {
    (0..count)
        .map(|i| format!("const value{i} = compute({i});"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn truncated_generation_keeps_every_complete_statement() {
    let complete = statements(25);
    let truncated = format!("{complete}\nconst value25 = compute(");

    let parser = LanguageParser::with_builtin_grammar(Language::JavaScript);
    let repaired = parser
        .trim_to_valid_suffix(&truncated, Some(DEFAULT_MIN_BLOCK_COUNT))
        .await
        .expect("trim");

    assert_eq!(repaired, complete);
    assert!(repaired.ends_with("const value24 = compute(24);"));
}

#[tokio::test]
async fn trailing_run_of_broken_statements_is_skipped() {
    let complete = statements(22);
    let truncated = format!("{complete}\nconst a = {{\nconst b = [\nconst c = (");

    let parser = LanguageParser::with_builtin_grammar(Language::TypeScript);
    let tree = parser.parse_text(&truncated).await.expect("parse");
    assert!(tree.has_error());

    let repaired = parser
        .trim_to_valid_suffix(&truncated, Some(20))
        .await
        .expect("trim");
    assert!(repaired.starts_with("const value0 = compute(0);"));
    assert!(!repaired.contains("const c"));
    // The floor of 20 leading children is never trimmed into.
    assert!(repaired.contains("const value19 = compute(19);"));
}

#[tokio::test]
async fn short_clean_text_loses_only_the_margin_child() {
    let parser = LanguageParser::with_builtin_grammar(Language::Python);
    let text = "import os\nx = 1\nprint(x)";

    let once = parser.trim_to_valid_suffix(text, None).await.expect("trim");
    assert_eq!(once, "import os\nx = 1");

    let twice = parser.trim_to_valid_suffix(text, None).await.expect("trim");
    assert_eq!(once, twice);
}

#[tokio::test]
async fn streamed_suffix_drops_leading_fragment() {
    let complete = statements(25);
    let streamed = format!("}}\n{complete}");

    let parser = LanguageParser::with_builtin_grammar(Language::JavaScript);
    let repaired = parser
        .trim_to_valid_prefix(&streamed, Some(20))
        .await
        .expect("trim");
    assert_eq!(repaired, complete);
}

#[tokio::test]
async fn streaming_preset_floor_applies() {
    let parser = LanguageParser::new(
        Language::JavaScript,
        ParserConfig::for_streaming(),
        std::sync::Arc::new(syntax_blocks::BuiltinGrammars),
    );
    let complete = statements(8);
    let truncated = format!("{complete}\nconst tail = [");

    let repaired = parser.trim_to_valid_suffix(&truncated, None).await.expect("trim");
    assert_eq!(repaired, complete);
}

#[tokio::test]
async fn empty_and_whitespace_text_round_trips() {
    let parser = LanguageParser::with_builtin_grammar(Language::Rust);
    for text in ["", "\n\n   \n"] {
        assert_eq!(parser.trim_to_valid_suffix(text, None).await.expect("trim"), text);
        assert_eq!(parser.trim_to_valid_prefix(text, None).await.expect("trim"), text);
    }
}

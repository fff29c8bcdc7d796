use syntax_blocks::{BlockInfo, Language, LanguageParser, Range, SourceDocument};

fn document(id: &str, text: &str) -> SourceDocument {
    SourceDocument::new(id, 1, text)
}

fn summary(blocks: &[BlockInfo]) -> Vec<(&'static str, String)> {
    blocks
        .iter()
        .map(|block| (block.category(), block.name().unwrap_or_default().to_string()))
        .collect()
}

#[tokio::test]
async fn python_classes_and_methods() {
    let parser = LanguageParser::with_builtin_grammar(Language::Python);
    let doc = document(
        "greeter.py",
        r#"
class Greeter:
    def __init__(self, name):
        self.name = name

    def greet(self, loud=False):
        return f"hi {self.name}"

def main():
    Greeter("x").greet()
"#,
    );

    let symbols = parser
        .list_all_functions_and_classes(&doc)
        .await
        .expect("symbols");
    assert_eq!(
        summary(&symbols),
        vec![
            ("class", "Greeter".to_string()),
            ("function", "__init__".to_string()),
            ("function", "greet".to_string()),
            ("function", "main".to_string()),
        ]
    );
}

#[tokio::test]
async fn rust_items_and_signatures() {
    let parser = LanguageParser::with_builtin_grammar(Language::Rust);
    let doc = document(
        "lib.rs",
        "pub struct Point { x: i32 }\n\npub trait Shape {\n    fn area(&self) -> f64;\n}\n\nfn origin() -> Point { Point { x: 0 } }\n",
    );

    let symbols = parser
        .list_all_functions_and_classes(&doc)
        .await
        .expect("symbols");
    assert_eq!(
        summary(&symbols),
        vec![
            ("class", "Point".to_string()),
            ("class", "Shape".to_string()),
            ("function", "area".to_string()),
            ("function", "origin".to_string()),
        ]
    );
}

#[tokio::test]
async fn offset_lookup_prefers_smallest_enclosing_function() {
    let source = "function outer() {\n  function inner(x) {\n    return x;\n  }\n  return inner;\n}\n";
    let parser = LanguageParser::with_builtin_grammar(Language::JavaScript);
    let doc = document("nested.js", source);

    let inside_inner = source.find("return x").expect("offset");
    let block = parser
        .find_block_at_offset(&doc, inside_inner)
        .await
        .expect("lookup")
        .expect("block");
    assert_eq!(block.name(), Some("inner"));
    assert_eq!(block.range(), Range::new(2, 3, 4, 4));

    let inside_outer = source.find("return inner").expect("offset");
    let block = parser
        .find_block_at_offset(&doc, inside_outer)
        .await
        .expect("lookup")
        .expect("block");
    assert_eq!(block.name(), Some("outer"));
}

#[tokio::test]
async fn offset_on_closing_brace_is_inside() {
    let source = "function f() {}\nlet x = 1;\n";
    let parser = LanguageParser::with_builtin_grammar(Language::JavaScript);
    let doc = document("end.js", source);

    let closing = source.find('}').expect("offset");
    let block = parser
        .find_block_at_offset(&doc, closing)
        .await
        .expect("lookup");
    assert_eq!(block.as_ref().and_then(BlockInfo::name), Some("f"));

    let after = source.find("x =").expect("offset");
    let block = parser.find_block_at_offset(&doc, after).await.expect("lookup");
    assert_eq!(block.map(|b| b.kind().to_string()), Some("lexical_declaration".to_string()));
}

#[tokio::test]
async fn exported_arrow_is_reported_over_the_declaration() {
    let source = "export const load = async (url) => {\n  return fetch(url);\n};\n";
    let parser = LanguageParser::with_builtin_grammar(Language::TypeScript);
    let doc = document("load.ts", source);

    let symbols = parser
        .list_all_functions_and_classes(&doc)
        .await
        .expect("symbols");
    assert_eq!(symbols.len(), 1);
    let BlockInfo::Function(info) = &symbols[0] else {
        panic!("expected function, got {:?}", symbols[0]);
    };
    assert_eq!(info.name, "load");
    assert_eq!(info.parameter_names, vec!["url".to_string()]);
    assert_eq!(info.kind, "arrow_function");
    // `export` wraps the declaration; the reported range starts at `const`.
    assert_eq!((info.range.start_line, info.range.start_column), (1, 8));
    assert_eq!(info.range.end_line, 3);
}

#[tokio::test]
async fn jsx_markup_counts_as_blocks() {
    let source = "const App = () => <div><span>{name}</span></div>;\n";
    let parser = LanguageParser::with_builtin_grammar(Language::JavaScriptReact);
    let doc = document("app.jsx", source);

    let blocks = parser.list_all_blocks(&doc).await.expect("blocks");
    let kinds: Vec<_> = blocks.iter().map(BlockInfo::kind).collect();
    assert!(kinds.contains(&"jsx_element"), "got {kinds:?}");
    assert!(kinds.contains(&"jsx_expression"), "got {kinds:?}");

    let plain = LanguageParser::with_builtin_grammar(Language::JavaScript);
    let blocks = plain.list_all_blocks(&doc).await.expect("blocks");
    assert!(blocks.iter().all(|block| !block.kind().starts_with("jsx")));
}

#[tokio::test]
async fn go_and_java_symbols() {
    let go = LanguageParser::with_builtin_grammar(Language::Go);
    let doc = document(
        "main.go",
        "package main\n\ntype Server struct{}\n\nfunc (s *Server) Start(port int) {}\n",
    );
    let symbols = go.list_all_functions_and_classes(&doc).await.expect("symbols");
    assert_eq!(
        summary(&symbols),
        vec![
            ("class", "Server".to_string()),
            ("function", "Start".to_string()),
        ]
    );

    let java = LanguageParser::with_builtin_grammar(Language::Java);
    let doc = document(
        "App.java",
        "public class App {\n  public App(int size) {}\n  void run() {}\n}\n",
    );
    let symbols = java
        .list_all_functions_and_classes(&doc)
        .await
        .expect("symbols");
    assert_eq!(
        summary(&symbols),
        vec![
            ("class", "App".to_string()),
            ("function", "App".to_string()),
            ("function", "run".to_string()),
        ]
    );
}

#[tokio::test]
async fn range_lookup_and_error_free_container() {
    let source = "class Store {\n  get(key) {\n    return this.items[key];\n  }\n}\nfunction broken( {\n";
    let parser = LanguageParser::with_builtin_grammar(Language::JavaScript);
    let doc = document("store.js", source);

    let block = parser
        .find_block_in_range(&doc, Range::new(3, 5, 3, 10))
        .await
        .expect("lookup")
        .expect("block");
    assert_eq!(block.category(), "class");
    assert_eq!(block.name(), Some("Store"));

    let container = parser
        .find_error_free_block(source, Range::new(3, 5, 3, 10))
        .await
        .expect("container");
    assert_eq!(container.kind(), "class_declaration");
    assert_eq!(container.range().start_line, 1);
    assert_eq!(container.range().end_line, 5);
}

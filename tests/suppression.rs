use no_capture::create_default_engine;

const SINK: &str = "    [NoCapture] T Invoke<T>(Func<T> func) => func();\n";

fn class_with(body: &str) -> String {
    format!("using System;\n\nclass C\n{{\n    private int _field;\n\n{body}\n{SINK}}}\n")
}

fn reported_rows(src: &str) -> Vec<usize> {
    let engine = create_default_engine();
    let diags = engine.lint_source(src).expect("linting should succeed");
    diags.iter().map(|d| d.span.start.row).collect()
}

#[test]
fn without_pragma_the_lint_fires() {
    let src = class_with("    void A() => Invoke(() => _field);");
    assert_eq!(reported_rows(&src), vec![7]);
}

#[test]
fn pragma_disable_by_code_suppresses_until_restore() {
    let src = class_with(
        "#pragma warning disable NOCAP001\n    void A() => Invoke(() => _field);\n#pragma warning restore NOCAP001\n    void B() => Invoke(() => _field);",
    );
    assert_eq!(reported_rows(&src), vec![10]);
}

#[test]
fn pragma_disable_by_lint_name_is_accepted() {
    let src = class_with(
        "#pragma warning disable no_capture // hot path reviewed\n    void A() => Invoke(() => _field);",
    );
    assert!(reported_rows(&src).is_empty());
}

#[test]
fn bare_pragma_disable_suppresses_every_lint() {
    let src = class_with(
        "#pragma warning disable\n    void A() => Invoke(() => _field);\n#pragma warning restore\n    void B() => Invoke(() => _field);",
    );
    assert_eq!(reported_rows(&src), vec![10]);
}

#[test]
fn pragma_for_other_ids_does_not_suppress() {
    let src = class_with(
        "#pragma warning disable CS0168, CA1822\n    void A() => Invoke(() => _field);",
    );
    assert_eq!(reported_rows(&src), vec![8]);
}

#[test]
fn pragma_lines_do_not_disturb_parsing() {
    let src = class_with(
        "    void A()\n    {\n#pragma warning disable NOCAP001\n        Invoke(() => _field);\n#pragma warning restore NOCAP001\n        Invoke(() => _field);\n    }",
    );
    assert_eq!(reported_rows(&src), vec![12]);
}

#[test]
fn auto_generated_header_skips_the_file() {
    let src = format!(
        "// <auto-generated>\n//     This code was generated by a tool.\n// </auto-generated>\n{}",
        class_with("    void A() => Invoke(() => _field);")
    );
    assert!(reported_rows(&src).is_empty());
}

#[test]
fn generated_file_name_skips_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("Pipeline.Designer.cs");
    std::fs::write(&path, class_with("    void A() => Invoke(() => _field);")).expect("write");

    let engine = create_default_engine();
    let diags = engine.lint_file(&path).expect("linting should succeed");
    assert!(diags.is_empty());

    let plain = dir.path().join("Pipeline.cs");
    std::fs::write(&plain, class_with("    void A() => Invoke(() => _field);")).expect("write");
    let diags = engine.lint_file(&plain).expect("linting should succeed");
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].file.as_deref(), Some(plain.display().to_string().as_str()));
}

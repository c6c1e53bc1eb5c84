// Copyright (C) Brian G. Milnes 2025

//! Integration tests for ToString() on string detection

mod common;
use common::{diagnostics, fixture, message};
use tostring_lint::parser::parser::parse;
use tostring_lint::{analyze, Severity, DIAGNOSTIC_ID};

fn assert_single(source: &str, line: u32, column: u32, receiver: &str) {
    let found = diagnostics(source);
    assert_eq!(found.len(), 1, "expected one diagnostic, got {found:#?}");
    let d = &found[0];
    assert_eq!(d.id, DIAGNOSTIC_ID);
    assert_eq!(d.severity, Severity::Warning);
    assert_eq!((d.location.line, d.location.column), (line, column));
    assert_eq!(d.message, message(receiver));
}

#[test]
fn test_empty_source_has_no_diagnostics() {
    assert!(diagnostics("").is_empty());
}

#[test]
fn test_const_string_member() {
    let source = fixture(true, &["Debug.WriteLine(sample.ToString());"]);
    assert_single(&source, 16, 31, "sample");
}

#[test]
fn test_const_string_member_with_format_argument() {
    let source = fixture(true, &["Console.WriteLine(sample.ToString(\"N\"));"]);
    assert_single(&source, 16, 33, "sample");
}

#[test]
fn test_string_method_result() {
    let source = fixture(true, &["System.Diagnostics.Debug.WriteLine(sample.Trim().ToString());"]);
    assert_single(&source, 16, 50, "sample.Trim()");
}

#[test]
fn test_string_array_element() {
    let source = fixture(
        false,
        &[
            "string[] sample = { \"sample\" };",
            "System.Diagnostics.Debug.WriteLine(sample[0].ToString());",
        ],
    );
    assert_single(&source, 16, 50, "sample[0]");
}

#[test]
fn test_string_literal_receiver() {
    let source = fixture(false, &["System.Diagnostics.Debug.WriteLine(\"sample\".ToString() + \"Abc\");"]);
    assert_single(&source, 15, 50, "\"sample\"");
}

#[test]
fn test_int_receiver_is_not_reported() {
    let source = fixture(false, &["System.Diagnostics.Debug.WriteLine(5.ToString());"]);
    assert!(diagnostics(&source).is_empty());
}

#[test]
fn test_result_of_int_to_string_is_reported() {
    let source = fixture(false, &["System.Diagnostics.Debug.WriteLine(5.ToString().ToString());"]);
    assert_single(&source, 15, 50, "5.ToString()");
}

#[test]
fn test_call_inside_format_argument_is_reported() {
    let source = fixture(false, &["System.Diagnostics.Debug.WriteLine(5.ToString(\"N\".ToString()));"]);
    assert_single(&source, 15, 61, "\"N\"");
}

#[test]
fn test_non_string_receivers_are_not_reported() {
    let body = [
        "int count = 3;",
        "double ratio = 0.5;",
        "bool flag = true;",
        "char letter = 'a';",
        "object boxed = \"x\";",
        "var list = new List<string>();",
        "Console.WriteLine(count.ToString());",
        "Console.WriteLine(ratio.ToString(\"N2\"));",
        "Console.WriteLine(flag.ToString());",
        "Console.WriteLine(letter.ToString());",
        "Console.WriteLine(boxed.ToString());",
        "Console.WriteLine(builder.ToString());",
        "Console.WriteLine(unknown.ToString());",
        "Console.WriteLine(this.ToString());",
        "Console.WriteLine((count + 1).ToString());",
    ];
    let found = diagnostics(&fixture(true, &body));
    assert!(found.is_empty(), "unexpected diagnostics: {found:#?}");
}

#[test]
fn test_other_members_named_like_to_string_are_not_reported() {
    let body = [
        "Console.WriteLine(sample.ToUpper());",
        "Console.WriteLine(sample.ToString);",
        "Console.WriteLine(sample.ToStringish());",
    ];
    let found = diagnostics(&fixture(true, &body));
    assert!(found.is_empty(), "unexpected diagnostics: {found:#?}");
}

#[test]
fn test_nested_calls_report_each_match() {
    let source = fixture(true, &["Debug.WriteLine(sample.ToString().ToString());"]);
    let found = diagnostics(&source);
    let receivers: Vec<&str> = found.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(receivers, vec![message("sample.ToString()"), message("sample")]);
    // Both start at the receiver; the outer span encloses the inner one.
    assert_eq!(found[0].location, found[1].location);
    assert!(found[0].span.contains_range(found[1].span));
}

#[test]
fn test_format_arguments_do_not_affect_detection() {
    let body = [
        "Console.WriteLine(sample.ToString());",
        "Console.WriteLine(sample.ToString(\"N\"));",
        "Console.WriteLine(sample.ToString(CultureInfo.InvariantCulture));",
        "Console.WriteLine(sample.ToString(\"N\", CultureInfo.InvariantCulture));",
    ];
    let found = diagnostics(&fixture(true, &body));
    assert_eq!(found.len(), 4);
    for (i, d) in found.iter().enumerate() {
        assert_eq!(d.location.line, 16 + i as u32);
        assert_eq!(d.message, message("sample"));
    }
}

#[test]
fn test_locals_fields_parameters_and_foreach_variables() {
    let source = "\
class Names
{
    private string first;
    public string Last { get; set; }

    public void Show(string title, int count)
    {
        string local = title;
        foreach (string item in first.Split(','))
        {
            Console.WriteLine(item.ToString());
        }
        Console.WriteLine(first.ToString());
        Console.WriteLine(Last.ToString());
        Console.WriteLine(title.ToString());
        Console.WriteLine(local.ToString());
        Console.WriteLine(count.ToString());
    }
}
";
    let found = diagnostics(source);
    let lines: Vec<u32> = found.iter().map(|d| d.location.line).collect();
    assert_eq!(lines, vec![11, 13, 14, 15, 16]);
}

#[test]
fn test_string_valued_library_calls() {
    let body = [
        "Console.WriteLine(string.Concat(sample, sample).ToString());",
        "Console.WriteLine(Console.ReadLine().ToString());",
        "Console.WriteLine((sample + 1).ToString());",
        "Console.WriteLine(sample.Substring(1).ToUpper().ToString());",
    ];
    let found = diagnostics(&fixture(true, &body));
    let receivers: Vec<&str> = found.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        receivers,
        vec![
            message("string.Concat(sample, sample)"),
            message("Console.ReadLine()"),
            message("(sample + 1)"),
            message("sample.Substring(1).ToUpper()"),
        ]
    );
}

#[test]
fn test_pragma_suppresses_the_rule() {
    let body = [
        "#pragma warning disable StringToStringAnalyzer",
        "Debug.WriteLine(sample.ToString());",
        "#pragma warning restore StringToStringAnalyzer",
        "Debug.WriteLine(sample.ToString());",
    ];
    let found = diagnostics(&fixture(true, &body));
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].location.line, 19);
}

#[test]
fn test_pragma_for_another_rule_does_not_suppress() {
    let body = ["#pragma warning disable CS0168", "Debug.WriteLine(sample.ToString());"];
    assert_eq!(diagnostics(&fixture(true, &body)).len(), 1);
}

#[test]
fn test_diagnostic_display_and_json() {
    let found = diagnostics(&fixture(true, &["Debug.WriteLine(sample.ToString());"]));
    assert_eq!(
        found[0].to_string(),
        "16:31: warning StringToStringAnalyzer: ToString() called on string member 'sample'"
    );
    let json = serde_json::to_value(&found[0]).unwrap();
    assert_eq!(json["id"], "StringToStringAnalyzer");
    assert_eq!(json["severity"], "warning");
    assert_eq!(json["location"]["line"], 16);
    assert_eq!(json["location"]["column"], 31);
    let start = json["span"]["start"].as_u64().unwrap();
    let end = json["span"]["end"].as_u64().unwrap();
    assert_eq!(end - start, "sample.ToString()".len() as u64);
}

#[test]
fn test_generic_invocations_are_typed_by_their_return_type() {
    let source = "\
class Generic
{
    int Foo<T>(string x) { return 1; }
    string Bar<T>(T x) { return \"\"; }

    void Show(string s)
    {
        Log(Foo<int>(s).ToString());
        Log(Bar<int>(1).ToString());
        Log(s.Get<List<string>>().ToString());
    }
}
";
    let found = diagnostics(source);
    assert_eq!(found.len(), 1, "{found:#?}");
    assert_eq!(found[0].message, message("Bar<int>(1)"));
    assert_eq!(found[0].location.line, 9);
}

#[test]
fn test_names_shadowed_by_unmodelled_declarations_are_not_reported() {
    let shadowing = [
        "try { Work(); } catch (Exception e) { Log(e.ToString()); }",
        "Action<int> a = e => Log(e.ToString());",
        "int.TryParse(\"1\", out int e); Log(e.ToString());",
        "if (o is int e) Log(e.ToString());",
        "using (var e = Open()) Log(e.ToString());",
        "void Local(int e) { Log(e.ToString()); }",
    ];
    for body in shadowing {
        let source = format!("class Shadow\n{{\n    string e = \"field\";\n    void Show(object o)\n    {{\n        {body}\n    }}\n}}\n");
        let parsed = parse(&source);
        assert!(!parsed.errors().is_empty(), "expected syntax errors for {body}");
        let found = analyze(&parsed.tree()).unwrap();
        assert!(found.is_empty(), "{body}: {found:#?}");
    }
}

#[test]
fn test_literal_receivers_are_reported_in_members_with_syntax_errors() {
    let source = "class Shadow { void Show() { try { } catch (Exception e) { Log(\"x\".ToString()); } } }";
    let found = analyze(&parse(source).tree()).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].message, message("\"x\""));
}

#[test]
fn test_calls_inside_interpolation_holes_are_reported() {
    let source = fixture(true, &["Debug.WriteLine($\"[{sample.ToString()}] {5.ToString(),4:N0}\");"]);
    assert_single(&source, 16, 35, "sample");
}

use camino::Utf8Path;
use plumbline_c::CProvider;
use plumbline_core::notes::rule;
use plumbline_core::{CheckConfig, Checker, Note, StyleChoice};

fn check_with(src: &str, config: CheckConfig) -> Vec<Note> {
    Checker::new(config)
        .unwrap()
        .check(Utf8Path::new("scenario.c"), src, &CProvider::new())
        .unwrap()
        .notes
}

fn spaces() -> CheckConfig {
    CheckConfig {
        style: StyleChoice::Spaces,
        ..CheckConfig::default()
    }
}

#[test]
fn brace_on_its_own_line_with_short_body_indent() {
    let notes = check_with("if (x)\n{\n  foo();\n}\n", spaces());
    assert!(!notes.is_empty());
    assert!(notes.iter().all(|n| n.span.start.line == 3), "{notes:#?}");
    assert!(notes.iter().any(|n| n.rule == rule::WRONG_LEVEL));
}

#[test]
fn flush_case_labels_are_accepted() {
    let notes = check_with("switch(x){\ncase 1:\n    break;\n}\n", spaces());
    assert!(notes.is_empty(), "{notes:#?}");
}

#[test]
fn indented_case_label_is_accepted() {
    let notes = check_with("switch(x){\n    case 1:\n    break;\n}\n", spaces());
    assert!(notes.is_empty(), "{notes:#?}");
}

#[test]
fn case_body_deeper_than_label_plus_one_is_flagged() {
    let notes = check_with("switch(x){\ncase 1:\n        break;\n}\n", spaces());
    assert_eq!(notes.len(), 1, "{notes:#?}");
    assert_eq!(notes[0].span.start.line, 3);
}

#[test]
fn tab_width_changes_what_a_level_is() {
    let src = "void f(void)\n{\n  g();\n}\n";
    assert!(check_with(src, spaces()).iter().any(|n| n.rule == rule::EXTRA_SPACES));
    let two = CheckConfig {
        tab_width: 2,
        ..spaces()
    };
    assert!(check_with(src, two).is_empty());
}

#[test]
fn multi_line_call_arguments_may_align() {
    let src = "void f(void)\n{\n    g(1,\n      2);\n}\n";
    assert!(check_with(src, spaces()).is_empty());
}

#[test]
fn multi_line_initializer_closes_at_declaration_level() {
    let src = "int v[] = {\n    1,\n    2,\n};\n";
    assert!(check_with(src, spaces()).is_empty());
}

#[test]
fn tab_in_space_file_is_flagged() {
    let src = "void f(void)\n{\n\tg();\n}\n";
    let notes = check_with(src, spaces());
    assert_eq!(notes.len(), 1, "{notes:#?}");
    assert_eq!(notes[0].rule, rule::TAB_INDENTATION);
}

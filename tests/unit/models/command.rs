use super::*;

#[test]
fn test_command_names() {
    assert_eq!(
        Command::Insert {
            at: 1,
            label: "x".into()
        }
        .name(),
        "insert"
    );
    assert_eq!(Command::Swap { a: 1, b: 2 }.name(), "swap");
    assert_eq!(
        Command::Move {
            range: LineRange::point(3),
            to: 7
        }
        .name(),
        "move"
    );
}

#[test]
fn test_display_uses_command_syntax() {
    let insert = Command::Insert {
        at: 3,
        label: "print(\"hi\")".into(),
    };
    assert_eq!(insert.to_string(), r#"line "print(\"hi\")" 3"#);

    let delete = Command::Delete {
        range: LineRange::new(2, 4),
        force: true,
    };
    assert_eq!(delete.to_string(), "-delete (2,4)");

    let rename = Command::Rename {
        range: LineRange::point(5),
        label: "x".into(),
    };
    assert_eq!(rename.to_string(), r#"change "x" 5"#);

    let mv = Command::Move {
        range: LineRange::new(3, 4),
        to: 7,
    };
    assert_eq!(mv.to_string(), "move (3,4) 7");
}

#[test]
fn test_serde_json_shape() {
    let cmd = Command::Swap { a: 2, b: 5 };
    let json = serde_json::to_string(&cmd).unwrap();
    assert_eq!(json, r#"{"Swap":{"a":2,"b":5}}"#);
    let back: Command = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cmd);
}

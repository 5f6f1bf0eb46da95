// tests/integration_tests.rs
use runpad::config::AppConfig;
use runpad::errors::RunpadError;
use runpad::language::Language;
use runpad::session::{RunStatus, Session};
use runpad::view;

#[test]
fn test_config_file_loading() {
    let path = std::env::temp_dir().join(format!("runpad-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(
        &path,
        r#"
        default_language = "cpp"

        [backend]
        base_url = "http://runner:8000"
        timeout_seconds = 5
        transport_deadline_ms = 8000
        "#,
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.default_language, Language::Cpp);
    assert_eq!(config.backend.run_url(), "http://runner:8000/run");
    assert_eq!(config.backend.timeout_seconds, 5);
    assert_eq!(config.server.port, 8080);
}

#[test]
fn test_missing_config_file() {
    let err = AppConfig::load("/definitely/not/here/runpad.toml").unwrap_err();
    assert!(matches!(err, RunpadError::FileRead(_)));
}

#[test]
fn test_edit_select_and_export_flow() {
    let mut session = Session::new(Language::Python);
    session.set_source("print('edited')");
    session.set_input("Alice\nBob\n");

    session.select_language("java").unwrap();
    let export = session.export_source();
    assert_eq!(export.filename, "Main.java");
    assert_eq!(export.content, Language::Java.template());

    session.set_source("class Main {}");
    assert_eq!(session.export_source().content, "class Main {}");

    let rendered = view::render(&session);
    assert_eq!(rendered.picker.selected, "java");
    assert_eq!(rendered.editor.mode, "java");
    assert_eq!(rendered.input.text, "Alice\nBob\n");
    assert_eq!(rendered.status, RunStatus::Idle);
}

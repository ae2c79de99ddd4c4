use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["extract"]["startDelim"], "{{");
    assert_eq!(parsed["extract"]["output"], "locales/messages.pot");
    assert_eq!(parsed["compile"]["defaultLanguage"], "en");
    assert_eq!(parsed["compile"]["jsonOutputType"], "single");

    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    let (code, stdout, _) = run(cmd)?;
    assert_eq!(code, 0);
    assert_eq!(stdout, "\u{2713} Created .vgettextrc.json\n");

    let content = test.read_file(".vgettextrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".vgettextrc.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    let (code, stdout, stderr) = run(cmd)?;

    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert_eq!(stderr, "error: .vgettextrc.json already exists\n");
    assert_eq!(test.read_file(".vgettextrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;

    test.write_file("src/App.vue", "<template><p>{{ $gettext('Hi') }}</p></template>\n")?;
    test.create_dir("locales")?;

    let (code, _, stderr) = run(test.extract_command())?;
    assert_eq!(code, 0, "stderr: {}", stderr);
    let (code, _, stderr) = run(test.compile_command())?;
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(test.root().join("locales/translations.json").exists());

    Ok(())
}

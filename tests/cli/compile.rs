use anyhow::Result;
use serde_json::{Value, json};

use crate::{CliTest, run};

const TEMPLATE: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"

#: src/App.vue:3
msgid "Welcome"
msgstr ""

#: src/App.vue:4
msgctxt "nav"
msgid "Home"
msgstr ""
"#;

const DE_PO: &str = r#"msgid ""
msgstr ""
"Language: de\n"
"Content-Type: text/plain; charset=UTF-8\n"

msgid "Welcome"
msgstr "Willkommen"

#, fuzzy
msgctxt "nav"
msgid "Home"
msgstr "Start"

msgid "Obsolete"
msgstr "Veraltet"
"#;

fn project() -> Result<CliTest> {
    let test = CliTest::with_file("locales/messages.pot", TEMPLATE)?;
    test.write_file("locales/de.po", DE_PO)?;
    Ok(test)
}

fn read_json(test: &CliTest, path: &str) -> Result<Value> {
    Ok(serde_json::from_str(&test.read_file(path)?)?)
}

#[test]
fn test_compile_default_language() -> Result<()> {
    let test = project()?;

    let (code, stdout, stderr) = run(test.compile_command())?;
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("en 0/2 translated  locales/en.po (created)"));
    assert!(stdout.ends_with("\u{2713} Compiled 1 language\n"));

    assert!(test.root().join("locales/en.po").exists());
    let json = read_json(&test, "locales/translations.json")?;
    assert_eq!(json["en"]["$$NOCONTEXT"]["Welcome"]["msgstr"], json!([""]));

    Ok(())
}

#[test]
fn test_compile_merges_existing_translations() -> Result<()> {
    let test = project()?;

    let mut cmd = test.compile_command();
    cmd.args(["-l", "de", "--json-output-type", "both"]);
    let (code, stdout, stderr) = run(cmd)?;
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert!(stdout.contains("de 2/2 translated  locales/de.po"));

    let po = test.read_file("locales/de.po")?;
    assert!(po.contains("msgstr \"Willkommen\""));
    assert!(po.contains("src/App.vue:3"));
    assert!(!po.contains("Obsolete"));

    let per_language = read_json(&test, "locales/de.json")?;
    assert_eq!(
        per_language,
        json!({
            "de": {
                "$$NOCONTEXT": {"Welcome": {"msgid": "Welcome", "msgstr": ["Willkommen"]}},
                "nav": {"Home": {"msgctxt": "nav", "msgid": "Home", "msgstr": ["Start"]}}
            }
        })
    );
    assert_eq!(read_json(&test, "locales/translations.json")?, per_language);
    assert!(test.read_file("locales/de.json")?.starts_with("{\n\t\"de\""));

    Ok(())
}

#[test]
fn test_compile_without_fuzzy_and_join() -> Result<()> {
    let test = project()?;

    let mut cmd = test.compile_command();
    cmd.args(["-l", "de", "--no-fuzzy-in-json"]);
    run(cmd)?;
    let json = read_json(&test, "locales/translations.json")?;
    assert!(json["de"]["nav"].get("Home").is_none());

    let mut cmd = test.compile_command();
    cmd.args(["-l", "de", "--no-join-existing"]);
    run(cmd)?;
    let json = read_json(&test, "locales/translations.json")?;
    assert_eq!(json["de"]["$$NOCONTEXT"]["Welcome"]["msgstr"], json!([""]));

    Ok(())
}

#[test]
fn test_compile_config_languages_and_multiple_output() -> Result<()> {
    let test = project()?;
    test.write_file(
        ".vgettextrc.json",
        r#"{ "compile": { "languages": ["de", "fr"], "jsonOutputType": "multiple" } }"#,
    )?;

    let (code, stdout, _) = run(test.compile_command())?;
    assert_eq!(code, 0);
    assert!(stdout.ends_with("\u{2713} Compiled 2 languages\n"));
    assert!(test.root().join("locales/de.json").exists());
    assert!(test.root().join("locales/fr.json").exists());
    assert!(!test.root().join("locales/translations.json").exists());

    Ok(())
}

#[test]
fn test_compile_missing_template_fails_languages() -> Result<()> {
    let test = CliTest::new()?;
    test.create_dir("locales")?;

    let mut cmd = test.compile_command();
    cmd.args(["-l", "de"]);
    let (code, stdout, stderr) = run(cmd)?;

    assert_eq!(code, 1);
    assert!(stderr.contains("Couldn't write output files for language de"));
    assert!(stdout.ends_with("\u{2718} Compiled 0 of 1 language\n"));

    Ok(())
}

#[test]
fn test_compile_missing_json_dir() -> Result<()> {
    let test = project()?;

    let mut cmd = test.compile_command();
    cmd.args(["--json-dir", "public/i18n"]);
    let (code, _, stderr) = run(cmd)?;

    assert_eq!(code, 2);
    assert!(stderr.starts_with("Error: Locales JSON output directory public/i18n not found."));

    Ok(())
}

#[test]
fn test_extract_then_compile() -> Result<()> {
    let test = CliTest::with_file(
        "src/App.vue",
        r#"<template>
  <div>
    <p>{{ $gettext('Hello') }}</p>
    <translate t-plural="items" t-n="3">item</translate>
  </div>
</template>
"#,
    )?;
    test.create_dir("locales")?;

    let (code, _, stderr) = run(test.extract_command())?;
    assert_eq!(code, 0, "stderr: {}", stderr);

    test.write_file(
        "locales/de.po",
        r#"msgid ""
msgstr ""
"Language: de\n"
"Content-Type: text/plain; charset=UTF-8\n"

msgid "Hello"
msgstr "Hallo"
"#,
    )?;

    let mut cmd = test.compile_command();
    cmd.args(["-l", "de"]);
    let (code, _, stderr) = run(cmd)?;
    assert_eq!(code, 0, "stderr: {}", stderr);

    let po = test.read_file("locales/de.po")?;
    assert!(po.contains("msgstr \"Hallo\""));
    assert!(po.contains("msgid_plural \"items\""));

    assert_eq!(
        read_json(&test, "locales/translations.json")?,
        json!({
            "de": {
                "$$NOCONTEXT": {
                    "Hello": {"msgid": "Hello", "msgstr": ["Hallo"]},
                    "item": {"msgid": "item", "msgid_plural": "items", "msgstr": ["", ""]}
                }
            }
        })
    );

    Ok(())
}

use anyhow::Result;

use crate::{CliTest, run};

const APP_VUE: &str = r#"<template>
  <div>
    <h1>{{ $gettext('Welcome') }}</h1>
    <translate t-context="nav">Home</translate>
    <p v-translate t-plural="Apples" t-n="count">Apple</p>
  </div>
</template>

<script>
export default {
  methods: {
    greet() { return this.$gettext('Hi there') },
  },
}
</script>
"#;

fn project() -> Result<CliTest> {
    let test = CliTest::with_file("src/App.vue", APP_VUE)?;
    test.write_file("src/util.js", "export const x = $pgettext('menu', 'Open');\n")?;
    test.create_dir("locales")?;
    Ok(test)
}

#[test]
fn test_extract_with_defaults() -> Result<()> {
    let test = project()?;

    let (code, stdout, stderr) = run(test.extract_command())?;
    assert_eq!(code, 0, "stderr: {}", stderr);
    assert_eq!(
        stdout,
        "\u{2713} Extracted 5 messages from 2 files into locales/messages.pot\n"
    );

    let pot = test.read_file("locales/messages.pot")?;
    assert!(pot.contains("msgid \"Welcome\""));
    assert!(pot.contains("src/App.vue:3"));
    assert!(pot.contains("msgctxt \"nav\""));
    assert!(pot.contains("msgid_plural \"Apples\""));
    assert!(pot.contains("msgid \"Hi there\""));
    assert!(pot.contains("msgctxt \"menu\""));

    Ok(())
}

#[test]
fn test_extract_explicit_files_and_output() -> Result<()> {
    let test = project()?;
    test.create_dir("out")?;

    let mut cmd = test.extract_command();
    cmd.args(["src/*.js", "--output", "out/app.pot"]);
    let (code, stdout, _) = run(cmd)?;

    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "\u{2713} Extracted 1 message from 1 file into out/app.pot\n"
    );
    let pot = test.read_file("out/app.pot")?;
    assert!(pot.contains("msgid \"Open\""));
    assert!(!pot.contains("Welcome"));

    Ok(())
}

#[test]
fn test_extract_uses_config_file() -> Result<()> {
    let test = project()?;
    test.write_file(
        ".vgettextrc.json",
        r#"{ "extract": { "input": "src", "output": "locales/app.pot", "keywordSpec": { "gettext": { "aliases": ["tr"] } } } }"#,
    )?;
    test.write_file(
        "src/extra.js",
        "$tr('Aliased');\nconst o = { m() { return this.$tr('Method alias'); } };\ntr('Bare');\n",
    )?;

    let (code, _, stderr) = run(test.extract_command())?;
    assert_eq!(code, 0, "stderr: {}", stderr);
    let pot = test.read_file("locales/app.pot")?;
    assert!(pot.contains("msgid \"Aliased\""));
    assert!(pot.contains("msgid \"Method alias\""));
    // Aliases get the same `$` spellings as keywords; a bare call is not one.
    assert!(!pot.contains("msgid \"Bare\""));

    Ok(())
}

#[test]
fn test_extract_missing_output_directory() -> Result<()> {
    let test = CliTest::with_file("src/App.vue", APP_VUE)?;

    let (code, stdout, stderr) = run(test.extract_command())?;
    assert_eq!(code, 2);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Error: Output directory locales not found."));

    Ok(())
}

#[test]
fn test_extract_aborts_on_broken_script() -> Result<()> {
    let test = project()?;
    test.write_file("src/broken.js", "const = $gettext('x';\n")?;

    let (code, _, stderr) = run(test.extract_command())?;
    assert_eq!(code, 2);
    assert!(stderr.contains("src/broken.js"));
    assert!(!test.root().join("locales/messages.pot").exists());

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = project()?;
    test.write_file(".vgettextrc.json", r#"{ "extract": { "startDelim": "" } }"#)?;

    let (code, _, stderr) = run(test.extract_command())?;
    assert_eq!(code, 2);
    assert!(stderr.starts_with("Error:"));

    Ok(())
}

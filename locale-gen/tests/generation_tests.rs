//! Integration tests for locale-gen.
//!
//! These tests drive the public API end to end: rendering, writing through
//! a file system, triggers and settings working together.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use locale_gen::{
    GeneratorOptions, LocaleGenerator, MemoryFileSystem, Regenerator, SettingsStore,
    TableDescriptor, Trigger,
};
use tempfile::TempDir;
use uuid::Uuid;

const UI_TEXTS_ID: &str = "11111111-1111-1111-1111-111111111111";

fn ui_texts() -> TableDescriptor {
    TableDescriptor::new("UI Texts", Uuid::parse_str(UI_TEXTS_ID).unwrap())
        .with_entry("ok", 1)
        .with_entry("cancel", 2)
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn test_end_to_end_ui_texts() {
    let document = LocaleGenerator::default().render(&[ui_texts()]);
    let text = document.text();

    let class = document.class("Locale_UITexts").expect("class is emitted");
    assert_eq!(class.accessors, vec!["Cancel", "Ok"]);

    assert!(text.contains(&format!(
        "private static readonly Guid TableGuid = new(\"{UI_TEXTS_ID}\");"
    )));

    let cancel = text
        .find("public static LocalizedString Cancel => _cancel.Value;")
        .unwrap();
    let ok = text
        .find("public static LocalizedString Ok => _ok.Value;")
        .unwrap();
    assert!(cancel < ok, "accessors must be alphabetical");

    assert!(text.contains("new LocalizedString(TableGuid, 2)"));
    assert!(text.contains("new LocalizedString(TableGuid, 1)"));
}

#[test]
fn test_full_document_layout() {
    let options = GeneratorOptions::default().with_prefix("L");
    let tables = vec![TableDescriptor::new("Menu", Uuid::from_u128(0xabc)).with_entry("play", 5)];

    let text = LocaleGenerator::new(options).render(&tables).text();

    let expected = r#"//Auto-Generated file. Do not modify this file!
using System;
using UnityEngine.Localization;
using System.Diagnostics.Contracts;
using System.Collections.Generic;
using System.Linq;

public static class LMenu
{
    private static readonly Guid TableGuid = new("00000000-0000-0000-0000-000000000abc");

    private static readonly Lazy<LocalizedString> _play = new( () => new LocalizedString(TableGuid, 5));
    public static LocalizedString Play => _play.Value;
}

public static class LocalizationExtensions
{
    [Pure]
    public static LocalizedString Clone(this LocalizedString localeString)
    {
        return new LocalizedString(localeString.TableReference, localeString.TableEntryReference);
    }
    [Pure]
    public static LocalizedString WithArguments(this LocalizedString text, params string[] args)
    {
        var textWithArgs = text.Clone();
        textWithArgs.Arguments = args;
        return textWithArgs;
    }
    [Pure]
    public static LocalizedString WithArguments(this LocalizedString text, IDictionary<string, string> args)
    {
        var textWithArgs = text.Clone();
        textWithArgs.Arguments = new object[] { args };
        return textWithArgs;
    }
    [Pure]
    public static LocalizedString WithArguments(this LocalizedString text, params (string Key, string Value)[] args)
    {
        var dict = args.ToDictionary(pair => pair.Key, pair => pair.Value);
        return text.WithArguments(dict);
    }
}
"#;

    assert_eq!(text, expected);
}

#[test]
fn test_tables_keep_input_order() {
    let tables = vec![
        TableDescriptor::new("Zeta", Uuid::from_u128(1)),
        TableDescriptor::new("Alpha", Uuid::from_u128(2)),
    ];

    let document = LocaleGenerator::default().render(&tables);
    let names: Vec<_> = document
        .classes()
        .iter()
        .map(|c| c.class_name.as_str())
        .collect();

    assert_eq!(names, vec!["Locale_Zeta", "Locale_Alpha"]);
}

#[test]
fn test_skipped_entry_does_not_disturb_neighbours() {
    let with_blank = TableDescriptor::new("Menu", Uuid::from_u128(1))
        .with_entry("a", 1)
        .with_entry("  ", 2)
        .with_entry("", 3)
        .with_entry("b", 4);
    let without_blank = TableDescriptor::new("Menu", Uuid::from_u128(1))
        .with_entry("a", 1)
        .with_entry("b", 4);

    let generator = LocaleGenerator::default();
    assert_eq!(
        generator.render(&[with_blank]).text(),
        generator.render(&[without_blank]).text()
    );
}

// =============================================================================
// Generation through a file system
// =============================================================================

#[test]
fn test_generate_twice_is_byte_identical() {
    let generator = LocaleGenerator::default();
    let path = PathBuf::from("Assets/LocaleClasses.g.cs");
    let mut fs = MemoryFileSystem::new();

    generator.generate(&[ui_texts()], &path, &mut fs).unwrap();
    let first = fs.file(&path).unwrap().to_string();

    generator.generate(&[ui_texts()], &path, &mut fs).unwrap();
    assert_eq!(fs.file(&path).unwrap(), first);
    assert_eq!(fs.imported().len(), 2);
}

// =============================================================================
// Settings wired to the regenerator
// =============================================================================

#[test]
fn test_target_folder_change_relocates_output() {
    let dir = TempDir::new().unwrap();
    let root = PathBuf::from("project");
    let mut store = SettingsStore::open(dir.path().join("settings.toml"), dir.path()).unwrap();

    let old_path = root.join("Assets/LocaleClasses.g.cs");
    let regenerator = Rc::new(RefCell::new(Regenerator::new(
        GeneratorOptions::default(),
        &root,
        vec![ui_texts()],
        MemoryFileSystem::new().with_file(&old_path, "previous output"),
    )));

    let listener_regen = Rc::clone(&regenerator);
    store.subscribe(move |change, settings| {
        let _ = listener_regen
            .borrow_mut()
            .handle(&Trigger::from(change), settings);
    });

    store.set_target_folder("Assets/Localization").unwrap();

    let regen = regenerator.borrow();
    let fs = regen.file_system();
    assert!(fs.file(&old_path).is_none());
    let new_path = root.join("Assets/Localization/LocaleClasses.g.cs");
    assert!(fs.file(&new_path).unwrap().contains("Locale_UITexts"));
    assert_eq!(store.target_folder(), Path::new("Assets/Localization"));
}

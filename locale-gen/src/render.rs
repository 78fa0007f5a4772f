//! C# document rendering.
//!
//! Turns a table snapshot into the complete text of the generated file. This
//! is a pure transformation: no I/O happens here, so the same snapshot and
//! options always render byte-identical output.

use crate::generator::GeneratorOptions;
use crate::model::TableDescriptor;
use crate::sanitize::sanitize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

/// Name of the per-class field holding the table id.
pub const TABLE_GUID_FIELD: &str = "TableGuid";

/// Name of the static class holding the helper extensions.
pub const EXTENSIONS_CLASS: &str = "LocalizationExtensions";

/// Fixed header emitted at the top of every generated file.
pub const HEADER: [&str; 6] = [
    "//Auto-Generated file. Do not modify this file!",
    "using System;",
    "using UnityEngine.Localization;",
    "using System.Diagnostics.Contracts;",
    "using System.Collections.Generic;",
    "using System.Linq;",
];

const INDENT: &str = "    ";

/// A fully rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    lines: Vec<String>,
    classes: Vec<GeneratedClass>,
}

/// Summary of one rendered table class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClass {
    /// Raw table name as supplied by the host.
    pub table_name: String,

    /// Table identifier baked into the class.
    pub table_id: Uuid,

    /// Emitted class name, prefix included.
    pub class_name: String,

    /// Emitted accessor names, in declaration order.
    pub accessors: Vec<String>,
}

impl GeneratedDocument {
    /// Rendered lines, without line terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Rendered classes, in declaration order.
    pub fn classes(&self) -> &[GeneratedClass] {
        &self.classes
    }

    /// Find a rendered class by its emitted name.
    pub fn class(&self, class_name: &str) -> Option<&GeneratedClass> {
        self.classes.iter().find(|c| c.class_name == class_name)
    }

    /// Total number of accessors across all classes.
    pub fn accessor_count(&self) -> usize {
        self.classes.iter().map(|c| c.accessors.len()).sum()
    }

    /// Complete file text, `\n`-terminated lines.
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Line-oriented writer with block indentation.
#[derive(Debug, Default)]
struct SourceWriter {
    lines: Vec<String>,
    depth: usize,
}

impl SourceWriter {
    fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{}", INDENT.repeat(self.depth), text));
        }
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn open(&mut self, declaration: impl AsRef<str>) {
        self.line(declaration);
        self.line("{");
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }
}

/// One accessor after sanitization and collision handling.
#[derive(Debug)]
struct Member {
    name: String,
    entry_id: u64,
}

/// Render the complete document for `tables`.
///
/// Tables keep their input order; entries within a table are ordered by raw
/// key. Tables and entries whose names sanitize to nothing are skipped.
pub fn render(tables: &[TableDescriptor], options: &GeneratorOptions) -> GeneratedDocument {
    let mut writer = SourceWriter::default();
    let mut classes = Vec::new();
    let mut used_class_names = HashSet::new();

    for line in HEADER {
        writer.line(line);
    }
    writer.blank();

    for table in tables {
        let Some(sanitized) = sanitize(&table.name, options.table_policy) else {
            debug!(table = %table.name, id = %table.id, "skipping table with unusable name");
            continue;
        };

        let class_name = unique_class_name(
            format!("{}{}", options.prefix, sanitized),
            &mut used_class_names,
            table,
        );

        let members = collect_members(table, &class_name, options);
        render_class(&mut writer, &class_name, table.id, &members);

        classes.push(GeneratedClass {
            table_name: table.name.clone(),
            table_id: table.id,
            class_name,
            accessors: members.into_iter().map(|m| m.name).collect(),
        });
    }

    render_extensions(&mut writer);

    GeneratedDocument {
        lines: writer.lines,
        classes,
    }
}

/// Reserve a class name, appending `_2`, `_3`, ... when it is already taken.
fn unique_class_name(
    candidate: String,
    used: &mut HashSet<String>,
    table: &TableDescriptor,
) -> String {
    if used.insert(candidate.clone()) {
        return candidate;
    }

    let mut suffix = 2;
    loop {
        let renamed = format!("{candidate}_{suffix}");
        if used.insert(renamed.clone()) {
            warn!(
                table = %table.name,
                id = %table.id,
                class = %candidate,
                renamed = %renamed,
                "table class name collides with an earlier table"
            );
            return renamed;
        }
        suffix += 1;
    }
}

/// Sanitize and order the entries of a table.
///
/// When two keys sanitize to the same name, the later one (in key order)
/// replaces the earlier one in place. Accessors are then kept clear of every
/// other member the class declares.
fn collect_members(
    table: &TableDescriptor,
    class_name: &str,
    options: &GeneratorOptions,
) -> Vec<Member> {
    let mut members: Vec<Member> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in table.sorted_entries() {
        let Some(name) = sanitize(&entry.key, options.entry_policy) else {
            debug!(table = %table.name, key = %entry.key, "skipping entry with unusable key");
            continue;
        };

        match positions.get(&name) {
            Some(&index) => {
                debug!(
                    table = %table.name,
                    key = %entry.key,
                    accessor = %name,
                    "entry key collides with an earlier key, replacing it"
                );
                members[index].entry_id = entry.id;
            }
            None => {
                positions.insert(name.clone(), members.len());
                members.push(Member {
                    name,
                    entry_id: entry.id,
                });
            }
        }
    }

    reserve_member_names(table, class_name, &mut members);
    members
}

/// Rename accessors that would clash with the table id field, the class
/// name or a backing field, appending `_2`, `_3`, ...
///
/// Every accessor name and backing field is reserved up front, so an
/// accessor such as `_ok` yields to the backing field of `Ok` rather than
/// the other way round, and a renamed accessor never takes a name a later
/// entry owns.
fn reserve_member_names(table: &TableDescriptor, class_name: &str, members: &mut [Member]) {
    let accessors: HashSet<String> = members.iter().map(|m| m.name.clone()).collect();
    let backing_fields: HashSet<String> =
        members.iter().map(|m| backing_field_name(&m.name)).collect();
    let mut used: HashSet<String> = HashSet::new();
    used.insert(TABLE_GUID_FIELD.to_string());
    used.insert(class_name.to_string());

    let is_free = |name: &str, used: &HashSet<String>| {
        !used.contains(name)
            && !backing_fields.contains(name)
            && !used.contains(&backing_field_name(name))
    };

    for member in members.iter_mut() {
        if !is_free(&member.name, &used) {
            let mut suffix = 2;
            let renamed = loop {
                let candidate = format!("{}_{suffix}", member.name);
                if is_free(&candidate, &used)
                    && !accessors.contains(&candidate)
                    && !backing_fields.contains(&backing_field_name(&candidate))
                {
                    break candidate;
                }
                suffix += 1;
            };
            warn!(
                table = %table.name,
                accessor = %member.name,
                renamed = %renamed,
                "accessor clashes with another member of its class"
            );
            member.name = renamed;
        }

        used.insert(backing_field_name(&member.name));
        used.insert(member.name.clone());
    }
}

fn render_class(writer: &mut SourceWriter, class_name: &str, table_id: Uuid, members: &[Member]) {
    writer.open(format!("public static class {class_name}"));

    writer.line(format!(
        "private static readonly Guid {TABLE_GUID_FIELD} = new(\"{table_id}\");"
    ));
    writer.blank();

    for member in members {
        let backing = backing_field_name(&member.name);
        writer.line(format!(
            "private static readonly Lazy<LocalizedString> {backing} = new( () => new LocalizedString({TABLE_GUID_FIELD}, {}));",
            member.entry_id
        ));
        writer.line(format!(
            "public static LocalizedString {} => {backing}.Value;",
            member.name
        ));
    }

    writer.close();
    writer.blank();
}

fn render_extensions(writer: &mut SourceWriter) {
    writer.open(format!("public static class {EXTENSIONS_CLASS}"));

    writer.line("[Pure]");
    writer.open("public static LocalizedString Clone(this LocalizedString localeString)");
    writer.line("return new LocalizedString(localeString.TableReference, localeString.TableEntryReference);");
    writer.close();

    writer.line("[Pure]");
    writer.open("public static LocalizedString WithArguments(this LocalizedString text, params string[] args)");
    writer.line("var textWithArgs = text.Clone();");
    writer.line("textWithArgs.Arguments = args;");
    writer.line("return textWithArgs;");
    writer.close();

    writer.line("[Pure]");
    writer.open(
        "public static LocalizedString WithArguments(this LocalizedString text, IDictionary<string, string> args)",
    );
    writer.line("var textWithArgs = text.Clone();");
    writer.line("textWithArgs.Arguments = new object[] { args };");
    writer.line("return textWithArgs;");
    writer.close();

    writer.line("[Pure]");
    writer.open(
        "public static LocalizedString WithArguments(this LocalizedString text, params (string Key, string Value)[] args)",
    );
    writer.line("var dict = args.ToDictionary(pair => pair.Key, pair => pair.Value);");
    writer.line("return text.WithArguments(dict);");
    writer.close();

    writer.close();
}

/// Private backing field for an accessor: `_` plus the name with its first
/// character lower-cased.
pub fn backing_field_name(accessor: &str) -> String {
    let mut chars = accessor.chars();
    match chars.next() {
        Some(first) => format!("_{}{}", first.to_ascii_lowercase(), chars.as_str()),
        None => "_".to_string(),
    }
}

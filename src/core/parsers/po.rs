//! PO/POT persistence through `polib`.
//!
//! The rest of the crate only sees [`Catalog`]; this module converts between
//! it and `polib`'s catalog for reading and writing files.

use std::path::Path;

use anyhow::{Context, Result};
use polib::{
    catalog::Catalog as PoCatalog,
    message::{Message, MessageMutView, MessageView},
    metadata::CatalogMetadata,
    po_file,
};

use crate::core::catalog::{
    Catalog, CatalogHeaders, EntryComments, MessageEntry, SourceReference,
};

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let po = po_file::parse(path)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

    let mut catalog = Catalog::new(headers_from_metadata(&po.metadata));
    for message in po.messages() {
        if message.msgid().is_empty() {
            continue;
        }
        catalog.insert(entry_from_message(message));
    }
    Ok(catalog)
}

pub fn save_catalog(catalog: &Catalog, path: &Path) -> Result<()> {
    let mut po = PoCatalog::new(metadata_from_headers(&catalog.headers));
    for entry in catalog.entries() {
        po.append_or_update(message_from_entry(entry));
    }
    po_file::write(&po, path)
        .with_context(|| format!("Failed to write catalog {}", path.display()))
}

fn headers_from_metadata(metadata: &CatalogMetadata) -> CatalogHeaders {
    CatalogHeaders {
        project_id_version: metadata.project_id_version.clone(),
        pot_creation_date: metadata.pot_creation_date.clone(),
        po_revision_date: metadata.po_revision_date.clone(),
        last_translator: metadata.last_translator.clone(),
        language_team: metadata.language_team.clone(),
        mime_version: metadata.mime_version.clone(),
        content_type: metadata.content_type.clone(),
        content_transfer_encoding: metadata.content_transfer_encoding.clone(),
        language: metadata.language.clone(),
        nplurals: metadata.plural_rules.nplurals,
        plural_expr: metadata.plural_rules.expr.clone(),
    }
}

fn metadata_from_headers(headers: &CatalogHeaders) -> CatalogMetadata {
    let mut metadata = CatalogMetadata::new();
    metadata.project_id_version = headers.project_id_version.clone();
    metadata.pot_creation_date = headers.pot_creation_date.clone();
    metadata.po_revision_date = headers.po_revision_date.clone();
    metadata.last_translator = headers.last_translator.clone();
    metadata.language_team = headers.language_team.clone();
    metadata.mime_version = headers.mime_version.clone();
    metadata.content_type = headers.content_type.clone();
    metadata.content_transfer_encoding = headers.content_transfer_encoding.clone();
    metadata.language = headers.language.clone();
    if !headers.plural_expr.is_empty() {
        metadata.plural_rules.nplurals = headers.nplurals;
        metadata.plural_rules.expr = headers.plural_expr.clone();
    }
    metadata
}

fn entry_from_message<M: MessageView + ?Sized>(message: &M) -> MessageEntry {
    let (plural, translations) = if message.is_plural() {
        (
            message.msgid_plural().ok().map(str::to_string),
            message
                .msgstr_plural()
                .map(|forms| forms.to_vec())
                .unwrap_or_default(),
        )
    } else {
        (
            None,
            vec![message.msgstr().unwrap_or_default().to_string()],
        )
    };

    MessageEntry {
        context: message.msgctxt().to_string(),
        text: message.msgid().to_string(),
        plural,
        translations,
        comments: EntryComments {
            reference: message
                .source()
                .split_whitespace()
                .filter_map(SourceReference::parse)
                .collect(),
            extracted: message
                .comments()
                .lines()
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            flag: message.flags().iter().map(|flag| flag.to_string()).collect(),
        },
    }
}

fn message_from_entry(entry: &MessageEntry) -> Message {
    let mut builder = match &entry.plural {
        Some(plural) => {
            let mut builder = Message::build_plural();
            builder.with_msgid_plural(plural.clone());
            let mut forms = entry.translations.clone();
            if forms.len() < 2 {
                forms.resize(2, String::new());
            }
            builder.with_msgstr_plural(forms);
            builder
        }
        None => {
            let mut builder = Message::build_singular();
            builder.with_msgstr(entry.translations.first().cloned().unwrap_or_default());
            builder
        }
    };
    builder.with_msgid(entry.text.clone());
    if !entry.context.is_empty() {
        builder.with_msgctxt(entry.context.clone());
    }

    let mut message = builder.done();
    *message.source_mut() = entry
        .comments
        .reference
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    *message.comments_mut() = entry.comments.extracted.join("\n");
    for flag in &entry.comments.flag {
        message.flags_mut().add_flag(flag);
    }
    message
}

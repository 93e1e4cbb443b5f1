//! Hand-off of finished artwork to the outside world: an image host that
//! returns a public URL and a record store keyed by owner. Both are supplied
//! by the embedding application; nothing here retries.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::compositor::EncodedImage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SockRecord {
    pub id: Uuid,
    pub owner_key: String,
    pub image_url: String,
    /// User-authored text (letter body, signature, ...), keyed by field name.
    #[serde(default)]
    pub text: BTreeMap<String, String>,
}

pub trait ImageUploader {
    /// Uploads the encoded artwork and returns its public URL.
    fn upload(&self, image: &EncodedImage) -> Result<String>;
}

pub trait RecordStore {
    fn insert(&mut self, record: SockRecord) -> Result<()>;
    fn read(&self, id: Uuid) -> Result<Option<SockRecord>>;
    fn update(&mut self, id: Uuid, text: BTreeMap<String, String>) -> Result<()>;
}

/// Uploads the artwork, then records it under `owner_key`. Returns the new record id.
pub fn submit_artwork(
    uploader: &impl ImageUploader,
    store: &mut impl RecordStore,
    owner_key: &str,
    image: &EncodedImage,
) -> Result<Uuid> {
    if owner_key.trim().is_empty() {
        bail!("owner key is empty");
    }
    let image_url = uploader.upload(image).context("uploading artwork")?;
    if image_url.is_empty() {
        bail!("image host returned an empty URL");
    }
    let record = SockRecord {
        id: Uuid::new_v4(),
        owner_key: owner_key.to_string(),
        image_url,
        text: BTreeMap::new(),
    };
    let id = record.id;
    store
        .insert(record)
        .with_context(|| format!("inserting record {id}"))?;
    log::info!("artwork for {} stored as {}", owner_key, id);
    Ok(id)
}

/// Merges user-authored text fields into an existing record.
pub fn attach_text(
    store: &mut impl RecordStore,
    id: Uuid,
    fields: BTreeMap<String, String>,
) -> Result<()> {
    let mut record = store
        .read(id)
        .with_context(|| format!("reading record {id}"))?
        .with_context(|| format!("record {id} does not exist"))?;
    record.text.extend(fields);
    store
        .update(id, record.text)
        .with_context(|| format!("updating record {id}"))
}

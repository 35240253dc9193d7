//! Shared fixtures for sekai-core integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use sekai_core::{CharacterRecord, RepositoryFetcher, RepositoryMeta, Result, SekaiError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// Canned reply for one document URL.
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16),
    Malformed,
}

/// In-memory fetcher with per-URL replies, call recording, and an optional
/// gate that holds every `meta.json` request until permits are released.
#[derive(Default)]
pub struct ScriptedFetcher {
    metas: Mutex<HashMap<String, Reply<RepositoryMeta>>>,
    characters: Mutex<HashMap<String, Reply<Vec<CharacterRecord>>>>,
    calls: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `meta.json` requests until [`ScriptedFetcher::release`] is called.
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::default()
        }
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    /// Serve a healthy repository at `base_url`.
    pub fn with_repository(self, base_url: &str, meta_name: &str, records: Vec<CharacterRecord>) -> Self {
        self.set_meta(base_url, Reply::Ok(meta(meta_name)));
        self.set_characters(base_url, Reply::Ok(records));
        self
    }

    pub fn set_meta(&self, base_url: &str, reply: Reply<RepositoryMeta>) {
        self.metas
            .lock()
            .unwrap()
            .insert(format!("{}/meta.json", base_url), reply);
    }

    pub fn set_characters(&self, base_url: &str, reply: Reply<Vec<CharacterRecord>>) {
        self.characters
            .lock()
            .unwrap()
            .insert(format!("{}/characters.json", base_url), reply);
    }

    /// Every requested URL, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }

    fn record(&self, url: &str) {
        self.calls.lock().unwrap().push(url.to_string());
    }
}

fn resolve<T: Clone>(url: &str, reply: Option<Reply<T>>) -> Result<T> {
    match reply {
        Some(Reply::Ok(value)) => Ok(value),
        Some(Reply::Status(status)) => Err(SekaiError::HttpStatus {
            url: url.to_string(),
            status,
            reason: "Scripted".to_string(),
        }),
        Some(Reply::Malformed) => Err(serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into()),
        None => Err(SekaiError::HttpStatus {
            url: url.to_string(),
            status: 404,
            reason: "Not Found".to_string(),
        }),
    }
}

#[async_trait]
impl RepositoryFetcher for ScriptedFetcher {
    async fn fetch_meta(&self, meta_url: &str) -> Result<RepositoryMeta> {
        self.record(meta_url);
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        let reply = self.metas.lock().unwrap().get(meta_url).cloned();
        resolve(meta_url, reply)
    }

    async fn fetch_characters(&self, characters_url: &str) -> Result<Vec<CharacterRecord>> {
        self.record(characters_url);
        let reply = self.characters.lock().unwrap().get(characters_url).cloned();
        resolve(characters_url, reply)
    }
}

pub fn meta(name: &str) -> RepositoryMeta {
    RepositoryMeta {
        name: name.to_string(),
        description: Some(format!("{} stickers", name)),
        version: Some("1.0.0".to_string()),
    }
}

pub fn record(id: &str, name: &str, character: &str) -> CharacterRecord {
    CharacterRecord {
        id: id.to_string(),
        name: name.to_string(),
        character: character.to_string(),
        img: format!("{}.png", id),
        color: "#33ccaa".to_string(),
    }
}

pub fn miku() -> CharacterRecord {
    record("01", "Miku", "Miku Hatsune")
}

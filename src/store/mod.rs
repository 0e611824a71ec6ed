//! City record store.
//!
//! Every operation reads the whole document from the repository, works on
//! that copy and, for mutations, writes the whole document back before
//! returning. Mutations run one at a time inside a per-store critical section.

pub mod slug;

pub use slug::slugify;

use crate::error::{Result, StoreError};
use crate::models::City;
use crate::storage::DocumentRepository;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

const STAMP_FIELD: &str = "ultima_actualizacion_aproximada";

/// CRUD operations over the persisted city document
pub struct CityStore {
    repo: Arc<dyn DocumentRepository>,
    write_lock: Mutex<()>,
    clock: fn() -> DateTime<Utc>,
}

impl CityStore {
    pub fn new(repo: Arc<dyn DocumentRepository>) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
            clock: Utc::now,
        }
    }

    /// Replace the source of "now" used for update stamps
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.repo.backend_name()
    }

    /// All cities in insertion order
    pub async fn list(&self) -> Result<Vec<City>> {
        Ok(self.repo.load().await?.cities)
    }

    /// Find a city by id or by display name
    pub async fn get(&self, token: &str) -> Result<Option<City>> {
        let target = slugify(token);
        let document = self.repo.load().await?;

        Ok(document.cities.into_iter().find(|city| matches(city, &target)))
    }

    /// Validate and append a new city. The id is always derived from `ciudad`.
    pub async fn create(&self, payload: Value) -> Result<City> {
        let mut fields = into_object(payload)?;

        let ciudad = require_text(&fields, "ciudad")?;
        require_text(&fields, "moneda")?;
        require_list(&fields, "servicios_informales")?;

        let id = slugify(ciudad);
        if id.is_empty() {
            return Err(StoreError::validation(
                "El campo \"ciudad\" debe contener letras o números",
            ));
        }

        let stamp = stamp_for(&fields, (self.clock)())?;
        fields.insert("id".to_string(), Value::String(id));
        fields.insert(STAMP_FIELD.to_string(), Value::String(stamp));

        let city = into_city(fields)?;
        check_record(&city)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.repo.load().await?;

        if document.cities.iter().any(|existing| existing.id == city.id) {
            return Err(StoreError::conflict("La ciudad ya existe"));
        }

        document.cities.push(city.clone());
        self.repo.save(&document).await?;

        info!(id = %city.id, total = document.cities.len(), "City created");
        Ok(city)
    }

    /// Shallow-merge `payload` into the city addressed by `token`.
    ///
    /// Top-level keys replace the stored ones wholesale; nested objects such
    /// as `temporadas` are not merged key by key. The update stamp is always
    /// refreshed, even when nothing else changes.
    pub async fn update(&self, token: &str, payload: Value) -> Result<City> {
        let patch = into_object(payload)?;

        let _guard = self.write_lock.lock().await;
        let mut document = self.repo.load().await?;

        let target = slugify(token);
        let index = document
            .cities
            .iter()
            .position(|city| matches(city, &target))
            .ok_or_else(|| StoreError::not_found("Ciudad no encontrada"))?;

        if let Some(services) = patch.get("servicios_informales") {
            if !services.is_array() {
                return Err(list_required("servicios_informales"));
            }
        }

        let current = &document.cities[index];
        let new_id = patch
            .get("ciudad")
            .and_then(Value::as_str)
            .map(slugify)
            .filter(|id| !id.is_empty() && *id != current.id);

        if let Some(new_id) = &new_id {
            let taken = document
                .cities
                .iter()
                .enumerate()
                .any(|(i, city)| i != index && city.id == *new_id);
            if taken {
                return Err(StoreError::conflict("Ya existe otra ciudad con ese nombre"));
            }
        }

        let stamp = stamp_for(&patch, (self.clock)())?;

        let mut merged = match serde_json::to_value(current) {
            Ok(Value::Object(map)) => map,
            Ok(_) => Map::new(),
            Err(e) => return Err(StoreError::storage("serializing city", e)),
        };
        for (key, value) in patch {
            if key != "id" {
                merged.insert(key, value);
            }
        }
        if let Some(new_id) = new_id {
            debug!(from = %current.id, to = %new_id, "City id follows its new name");
            merged.insert("id".to_string(), Value::String(new_id));
        }
        merged.insert(STAMP_FIELD.to_string(), Value::String(stamp));

        let city = into_city(merged)?;
        check_record(&city)?;

        document.cities[index] = city.clone();
        self.repo.save(&document).await?;

        info!(id = %city.id, "City updated");
        Ok(city)
    }

    /// Remove every city matching `token`. Returns `false` when nothing matched.
    pub async fn delete(&self, token: &str) -> Result<bool> {
        let target = slugify(token);

        let _guard = self.write_lock.lock().await;
        let mut document = self.repo.load().await?;

        let before = document.cities.len();
        document.cities.retain(|city| !matches(city, &target));

        if document.cities.len() == before {
            return Ok(false);
        }

        self.repo.save(&document).await?;

        info!(token = %target, removed = before - document.cities.len(), "City deleted");
        Ok(true)
    }
}

/// A normalized token addresses a city by its stored id or by its current name
fn matches(city: &City, target: &str) -> bool {
    !target.is_empty() && (city.id == target || slugify(&city.ciudad) == target)
}

fn year_month(now: DateTime<Utc>) -> String {
    now.format("%Y-%m").to_string()
}

/// Caller-supplied stamp if non-empty, otherwise the current year-month
fn stamp_for(fields: &Map<String, Value>, now: DateTime<Utc>) -> Result<String> {
    match fields.get(STAMP_FIELD) {
        Some(Value::String(stamp)) if !stamp.is_empty() => Ok(stamp.clone()),
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(year_month(now)),
        Some(_) => Err(StoreError::validation(format!(
            "El campo \"{STAMP_FIELD}\" debe ser texto"
        ))),
    }
}

fn into_object(payload: Value) -> Result<Map<String, Value>> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::validation("Payload invalido")),
    }
}

fn into_city(fields: Map<String, Value>) -> Result<City> {
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| StoreError::validation(format!("Payload invalido: {e}")))
}

fn require_text<'a>(fields: &'a Map<String, Value>, field: &str) -> Result<&'a str> {
    match fields.get(field) {
        Some(Value::String(text)) if !text.is_empty() => Ok(text),
        _ => Err(StoreError::validation(format!(
            "El campo \"{field}\" es obligatorio"
        ))),
    }
}

fn require_list(fields: &Map<String, Value>, field: &str) -> Result<()> {
    match fields.get(field) {
        Some(Value::Array(_)) => Ok(()),
        _ => Err(list_required(field)),
    }
}

fn list_required(field: &str) -> StoreError {
    StoreError::validation(format!("El campo \"{field}\" debe ser una lista"))
}

/// Invariants serde cannot express: required text is non-empty, prices are non-negative
fn check_record(city: &City) -> Result<()> {
    for (field, value) in [("ciudad", &city.ciudad), ("moneda", &city.moneda)] {
        if value.is_empty() {
            return Err(StoreError::validation(format!(
                "El campo \"{field}\" es obligatorio"
            )));
        }
    }

    for (position, service) in city.servicios_informales.iter().enumerate() {
        let texts = [
            ("categoria", &service.categoria),
            ("servicio", &service.servicio),
            ("unidad", &service.unidad),
        ];
        for (field, value) in texts {
            if value.trim().is_empty() {
                return Err(StoreError::validation(format!(
                    "El servicio {} requiere el campo \"{field}\"",
                    position + 1
                )));
            }
        }

        let windows = [
            ("temporada_baja", &service.temporada_baja),
            ("temporada_alta", &service.temporada_alta),
        ];
        for (season, window) in windows {
            let bounds = [
                ("precio_min", &window.precio_min),
                ("precio_max", &window.precio_max),
            ];
            for (bound, price) in bounds {
                if price.as_f64().is_some_and(|p| p < 0.0) {
                    return Err(StoreError::validation(format!(
                        "El servicio {} tiene un {bound} negativo en {season}",
                        position + 1
                    )));
                }
            }
        }
    }

    Ok(())
}

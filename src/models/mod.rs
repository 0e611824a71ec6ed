use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Optional field that remembers an explicit `null`: `None` when the key is
/// absent, `Some(None)` when the caller sent `null`
pub type Nullable<T> = Option<Option<T>>;

fn present<'de, D, T>(deserializer: D) -> Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Price range for a service in one season
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceWindow {
    pub precio_min: Number,
    pub precio_max: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Seasonal context: approximate months and a description of the increase
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Season {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub meses_aproximados: Nullable<Vec<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub factor_incremento_promedio: Nullable<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// High and low season descriptions for a city
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Seasons {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub alta: Nullable<Season>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub baja: Nullable<Season>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single informal service with its low/high season prices
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub categoria: String,
    pub servicio: String,
    pub unidad: String,
    #[serde(default = "default_negotiable")]
    pub negociable: bool,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub nota: Nullable<String>,
    pub temporada_baja: PriceWindow,
    pub temporada_alta: PriceWindow,
    /// Caller-supplied keys this model does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_negotiable() -> bool {
    true
}

/// Core city record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct City {
    pub id: String,
    pub ciudad: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub pais: Nullable<String>,
    pub moneda: String,
    pub ultima_actualizacion_aproximada: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub nota_importante: Nullable<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub temporadas: Nullable<Seasons>,
    pub servicios_informales: Vec<Service>,
    /// Caller-supplied keys this model does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl City {
    pub fn pais(&self) -> Option<&str> {
        self.pais.as_ref().and_then(|p| p.as_deref())
    }

    pub fn temporadas(&self) -> Option<&Seasons> {
        self.temporadas.as_ref().and_then(Option::as_ref)
    }
}

/// The whole persisted collection
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CityDocument {
    pub cities: Vec<City>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_defaults_to_negotiable() {
        let service: Service = serde_json::from_value(json!({
            "categoria": "Transporte",
            "servicio": "Taxi",
            "unidad": "Trayecto",
            "temporada_baja": { "precio_min": 10000, "precio_max": 20000 },
            "temporada_alta": { "precio_min": 15000, "precio_max": 25000 }
        }))
        .unwrap();

        assert!(service.negociable);
        assert!(service.nota.is_none());
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let raw = json!({
            "id": "lima",
            "ciudad": "Lima",
            "moneda": "PEN",
            "ultima_actualizacion_aproximada": "2024-11",
            "servicios_informales": [],
            "fuente": "encuesta de campo"
        });

        let city: City = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(city.extra.get("fuente"), Some(&json!("encuesta de campo")));
        assert_eq!(serde_json::to_value(&city).unwrap(), raw);
    }

    #[test]
    fn integer_prices_stay_integers() {
        let window: PriceWindow =
            serde_json::from_value(json!({ "precio_min": 50000, "precio_max": 12.5 })).unwrap();

        assert_eq!(
            serde_json::to_string(&window).unwrap(),
            r#"{"precio_min":50000,"precio_max":12.5}"#
        );
    }

    #[test]
    fn nested_unknown_keys_survive_a_round_trip() {
        let raw = json!({
            "id": "lima",
            "ciudad": "Lima",
            "moneda": "PEN",
            "ultima_actualizacion_aproximada": "2024-11",
            "temporadas": {
                "alta": { "meses_aproximados": ["enero"], "fuente": "x" },
                "media": { "factor_incremento_promedio": "10%" }
            },
            "servicios_informales": [{
                "categoria": "Transporte",
                "servicio": "Mototaxi",
                "unidad": "Trayecto",
                "negociable": false,
                "temporada_baja": { "precio_min": 1, "precio_max": 2, "moneda": "USD" },
                "temporada_alta": { "precio_min": 2, "precio_max": 3 }
            }]
        });

        let city: City = serde_json::from_value(raw.clone()).unwrap();
        let seasons = city.temporadas().unwrap();
        assert_eq!(seasons.extra["media"]["factor_incremento_promedio"], "10%");
        assert_eq!(
            city.servicios_informales[0].temporada_baja.extra["moneda"],
            "USD"
        );
        assert_eq!(serde_json::to_value(&city).unwrap(), raw);
    }

    #[test]
    fn explicit_nulls_are_kept_apart_from_missing_keys() {
        let raw = json!({
            "id": "quito",
            "ciudad": "Quito",
            "pais": null,
            "moneda": "USD",
            "ultima_actualizacion_aproximada": "2024-11",
            "temporadas": { "alta": null },
            "servicios_informales": [{
                "categoria": "Comida",
                "servicio": "Almuerzo",
                "unidad": "Plato",
                "nota": null,
                "temporada_baja": { "precio_min": 3, "precio_max": 4 },
                "temporada_alta": { "precio_min": 4, "precio_max": 5 }
            }]
        });

        let city: City = serde_json::from_value(raw).unwrap();
        assert_eq!(city.pais, Some(None));
        assert_eq!(city.pais(), None);
        assert!(city.nota_importante.is_none());
        assert_eq!(city.servicios_informales[0].nota, Some(None));

        let back = serde_json::to_value(&city).unwrap();
        assert_eq!(back.get("pais"), Some(&Value::Null));
        assert!(back.get("nota_importante").is_none());
        assert_eq!(back["temporadas"].get("alta"), Some(&Value::Null));
        assert!(back["temporadas"].get("baja").is_none());
        assert_eq!(
            back["servicios_informales"][0].get("nota"),
            Some(&Value::Null)
        );
    }
}

use crate::api::AppState;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};

const SWAGGER_UI_PAGE: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8" />
  <title>API monitoreo de precios</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: '/api/docs.json', dom_id: '#swagger-ui' });
  </script>
</body>
</html>
"#;

/// GET /api/docs
pub async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_PAGE)
}

/// GET /api/docs.json
pub async fn openapi_json(State(state): State<AppState>) -> Json<Value> {
    Json(state.docs.as_ref().clone())
}

fn id_parameter() -> Value {
    json!([{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }])
}

fn city_body(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/City" } }
        }
    })
}

/// OpenAPI description of the HTTP surface
pub fn openapi_document(server_url: &str) -> Value {
    let not_found = json!({ "description": "Ciudad no encontrada" });

    json!({
        "openapi": "3.0.1",
        "info": {
            "title": "API monitoreo de precios",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Consulta y administración de precios informales por ciudad."
        },
        "servers": [{ "url": server_url, "description": "Entorno local" }],
        "tags": [
            { "name": "Health", "description": "Estado del servicio" },
            { "name": "Cities", "description": "Ciudades y sus servicios informales" }
        ],
        "components": {
            "schemas": {
                "PriceWindow": {
                    "type": "object",
                    "required": ["precio_min", "precio_max"],
                    "properties": {
                        "precio_min": { "type": "number", "minimum": 0, "example": 50000 },
                        "precio_max": { "type": "number", "minimum": 0, "example": 120000 }
                    }
                },
                "Season": {
                    "type": "object",
                    "properties": {
                        "meses_aproximados": {
                            "type": "array",
                            "items": { "type": "string", "example": "diciembre" }
                        },
                        "factor_incremento_promedio": {
                            "type": "string",
                            "example": "20% sobre temporada baja"
                        }
                    }
                },
                "Service": {
                    "type": "object",
                    "required": ["categoria", "servicio", "unidad", "temporada_baja", "temporada_alta"],
                    "properties": {
                        "categoria": { "type": "string", "example": "Transporte" },
                        "servicio": { "type": "string", "example": "Taxi aeropuerto" },
                        "unidad": { "type": "string", "example": "Trayecto" },
                        "negociable": { "type": "boolean", "default": true },
                        "nota": { "type": "string" },
                        "temporada_baja": { "$ref": "#/components/schemas/PriceWindow" },
                        "temporada_alta": { "$ref": "#/components/schemas/PriceWindow" }
                    }
                },
                "City": {
                    "type": "object",
                    "required": ["ciudad", "moneda", "servicios_informales"],
                    "properties": {
                        "id": { "type": "string", "readOnly": true, "example": "cartagena" },
                        "ciudad": { "type": "string", "example": "Cartagena" },
                        "pais": { "type": "string", "example": "Colombia" },
                        "moneda": { "type": "string", "example": "COP" },
                        "ultima_actualizacion_aproximada": { "type": "string", "example": "2024-12" },
                        "nota_importante": { "type": "string" },
                        "temporadas": {
                            "type": "object",
                            "properties": {
                                "alta": { "$ref": "#/components/schemas/Season" },
                                "baja": { "$ref": "#/components/schemas/Season" }
                            }
                        },
                        "servicios_informales": {
                            "type": "array",
                            "items": { "$ref": "#/components/schemas/Service" }
                        }
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } }
                }
            }
        },
        "paths": {
            "/api/health": {
                "get": {
                    "tags": ["Health"],
                    "summary": "Verifica la disponibilidad de la API",
                    "responses": { "200": { "description": "Servicio saludable" } }
                }
            },
            "/api/cities": {
                "get": {
                    "tags": ["Cities"],
                    "summary": "Lista todas las ciudades",
                    "responses": {
                        "200": {
                            "description": "Listado de ciudades",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/City" }
                                    }
                                }
                            }
                        }
                    }
                },
                "post": {
                    "tags": ["Cities"],
                    "summary": "Crea una ciudad con sus servicios",
                    "requestBody": city_body("Ciudad a crear"),
                    "responses": {
                        "201": city_body("Ciudad creada"),
                        "400": { "description": "Datos inválidos" },
                        "409": { "description": "La ciudad ya existe" }
                    }
                }
            },
            "/api/cities/{id}": {
                "get": {
                    "tags": ["Cities"],
                    "summary": "Obtiene una ciudad por identificador o nombre",
                    "parameters": id_parameter(),
                    "responses": { "200": city_body("Ciudad encontrada"), "404": not_found }
                },
                "put": {
                    "tags": ["Cities"],
                    "summary": "Actualiza los campos enviados de una ciudad",
                    "parameters": id_parameter(),
                    "requestBody": city_body("Campos a reemplazar"),
                    "responses": {
                        "200": city_body("Ciudad actualizada"),
                        "400": { "description": "Datos inválidos" },
                        "404": not_found,
                        "409": { "description": "Ya existe otra ciudad con ese nombre" }
                    }
                },
                "delete": {
                    "tags": ["Cities"],
                    "summary": "Elimina una ciudad",
                    "parameters": id_parameter(),
                    "responses": { "204": { "description": "Ciudad eliminada" }, "404": not_found }
                }
            }
        }
    })
}

use serde_json::{json, Value};

#[must_use]
pub fn openapi_v1_spec() -> Value {
    json!({
      "openapi": "3.0.3",
      "info": {
        "title": "nullresults API",
        "version": "v1"
      },
      "paths": {
        "/healthz": {"get": {"responses": {"200": {"description": "ok"}}}},
        "/readyz": {"get": {"responses": {"200": {"description": "ready"}, "503": {"description": "not ready"}}}},
        "/metrics": {"get": {"responses": {"200": {"description": "request counters"}}}},
        "/experiments": {
          "get": {
            "responses": {
              "200": {"description": "up to 20 most recent experiments, newest first"},
              "500": {"description": "store unavailable", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}}
            }
          },
          "post": {
            "requestBody": {
              "required": true,
              "content": {"application/json": {"schema": {"$ref": "#/components/schemas/NewExperiment"}}}
            },
            "responses": {
              "201": {"description": "created; body carries the new id"},
              "400": {"description": "malformed JSON or missing required fields", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}},
              "500": {"description": "store unavailable", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}}
            }
          }
        },
        "/experiments/{id}": {
          "get": {
            "parameters": [
              {"name": "id", "in": "path", "required": true, "schema": {"type": "integer", "minimum": 1}}
            ],
            "responses": {
              "200": {"description": "full experiment record"},
              "400": {"description": "invalid identifier", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}},
              "404": {"description": "no matching experiment", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}},
              "500": {"description": "store unavailable", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ApiError"}}}}
            }
          }
        }
      },
      "components": {
        "schemas": {
          "ApiErrorCode": {
            "type": "string",
            "enum": [
              "MalformedBody",
              "MissingRequiredFields",
              "InvalidId",
              "NotFound",
              "StoreUnavailable",
              "Internal"
            ]
          },
          "ApiError": {
            "type": "object",
            "required": ["code", "message", "details"],
            "additionalProperties": false,
            "properties": {
              "code": {"$ref": "#/components/schemas/ApiErrorCode"},
              "message": {"type": "string"},
              "details": {"type": "object"}
            }
          },
          "NewExperiment": {
            "type": "object",
            "required": ["title", "summary", "what_tried", "what_went_wrong", "what_learned"],
            "properties": {
              "title": {"type": "string"},
              "summary": {"type": "string"},
              "what_tried": {"type": "string"},
              "what_went_wrong": {"type": "string"},
              "what_learned": {"type": "string"},
              "tags": {"type": "string", "description": "comma-separated labels"},
              "author_name": {"type": "string"}
            }
          }
        }
      }
    })
}

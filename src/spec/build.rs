use super::error::CompileError;
use super::types::{
    endpoint_key, ArraySchema, EndpointMap, EndpointSchema, HttpMethod, IntegerSchema,
    ObjectSchema, RequestPart, StringSchema, ValidationSchema,
};
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

static PATH_CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9}{/_-]+$").expect("Failed to compile path charset regex")
});

static PARAM_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\{([a-zA-Z0-9_-]+)\}$").expect("Failed to compile path segment regex")
});

/// Compile a dereferenced spec document into the full endpoint map
///
/// Walks `paths` in declaration order and compiles every operation into an
/// [`EndpointSchema`] keyed by `"{method}:{path}"`.
///
/// # Errors
///
/// Returns the first [`CompileError`] found. No partial map is returned: a
/// contract that does not compile cleanly must not serve traffic.
pub fn compile_spec(document: &Value) -> Result<EndpointMap, CompileError> {
    info!("Compiling API contract");
    match compile_paths(document) {
        Ok(endpoints) => {
            info!(
                endpoints_count = endpoints.len(),
                "API contract compiled"
            );
            Ok(endpoints)
        }
        Err(err) => {
            error!(error = %err, "API contract compilation failed");
            Err(err)
        }
    }
}

fn compile_paths(document: &Value) -> Result<EndpointMap, CompileError> {
    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .ok_or(CompileError::MissingPaths)?;

    let mut endpoints = EndpointMap::with_capacity(paths.len());
    for (path, item) in paths {
        let methods = item.as_object().ok_or_else(|| CompileError::NotAnObject {
            location: path.clone(),
        })?;

        for (method_key, operation) in methods {
            let method = HttpMethod::from_spec_key(method_key).ok_or_else(|| {
                CompileError::UnsupportedMethod {
                    path: path.clone(),
                    method: method_key.clone(),
                }
            })?;
            let key = endpoint_key(method, path);
            let operation = operation
                .as_object()
                .ok_or_else(|| CompileError::NotAnObject {
                    location: key.clone(),
                })?;

            let schema = compile_endpoint(&key, path, operation)?;
            debug!(
                endpoint = %key,
                has_body = schema.request_body_schema.is_some(),
                body_required = schema.request_body_required,
                has_path_params = schema.path_params_schema.is_some(),
                has_query_params = schema.query_params_schema.is_some(),
                "Endpoint compiled"
            );
            endpoints.insert(key, schema);
        }
    }
    Ok(endpoints)
}

fn compile_endpoint(
    key: &str,
    path: &str,
    operation: &Map<String, Value>,
) -> Result<EndpointSchema, CompileError> {
    let path_param_names = extract_path_params(key, path)?;
    let mut endpoint = EndpointSchema::default();

    if let Some(body) = operation.get("requestBody") {
        let (schema, required) = compile_request_body(key, body)?;
        endpoint.request_body_schema = Some(schema);
        endpoint.request_body_required = required;
    }

    let parameters = operation.get("parameters");
    if parameters.is_some() || !path_param_names.is_empty() {
        let params = parameters
            .and_then(Value::as_array)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| CompileError::MissingParameters {
                endpoint: key.to_string(),
            })?;

        let (path_schema, query_schema) = compile_parameters(key, params)?;
        check_path_params(key, &path_param_names, path_schema.as_ref())?;
        endpoint.path_params_schema = path_schema;
        endpoint.query_params_schema = query_schema;
    }

    Ok(endpoint)
}

/// Extract the `{name}` placeholders of a declared path, in order
///
/// The whole path is first checked against the allowed character set, then
/// split on `/`; only segments of the exact form `{name}` are placeholders.
///
/// # Errors
///
/// Malformed paths and repeated placeholder names are compile errors.
pub fn extract_path_params(key: &str, path: &str) -> Result<Vec<String>, CompileError> {
    let invalid = |reason: String| CompileError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    if !path.starts_with('/') {
        return Err(invalid("must start with '/'".to_string()));
    }
    if path.len() > 1 && path.ends_with('/') {
        return Err(invalid("must not end with '/'".to_string()));
    }
    if path.len() > 1 && !PATH_CHARSET.is_match(path) {
        return Err(invalid(
            "contains characters outside [a-zA-Z0-9{}/_-]".to_string(),
        ));
    }

    let mut names: Vec<String> = Vec::with_capacity(path.matches('{').count());
    for segment in path.split('/') {
        if let Some(captures) = PARAM_SEGMENT.captures(segment) {
            let name = &captures[1];
            if names.iter().any(|n| n == name) {
                return Err(CompileError::DuplicatePathParam {
                    endpoint: key.to_string(),
                    name: name.to_string(),
                });
            }
            names.push(name.to_string());
        } else if segment.contains('{') || segment.contains('}') {
            return Err(invalid(format!("malformed placeholder segment '{segment}'")));
        }
    }
    Ok(names)
}

fn compile_request_body(key: &str, body: &Value) -> Result<(ObjectSchema, bool), CompileError> {
    let invalid = |reason: &str| CompileError::InvalidRequestBody {
        endpoint: key.to_string(),
        reason: reason.to_string(),
    };

    let body = body.as_object().ok_or_else(|| invalid("must be an object"))?;
    let schema = body
        .get("content")
        .and_then(|c| c.get("application/json"))
        .and_then(|m| m.get("schema"))
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("must declare a schema under content.application/json.schema"))?;

    if schema.get("type").and_then(Value::as_str) != Some("object") {
        return Err(invalid("schema must be of type 'object'"));
    }

    let compiled = compile_object(
        key,
        schema,
        RequestPart::RequestBody.as_str().to_string(),
    )?;
    let required = body.get("required") == Some(&Value::Bool(true));
    Ok((compiled, required))
}

#[derive(Default)]
struct ParamGroup {
    properties: IndexMap<String, ValidationSchema>,
    required: Vec<String>,
}

impl ParamGroup {
    fn into_schema(self, part: RequestPart) -> Option<ObjectSchema> {
        if self.properties.is_empty() {
            return None;
        }
        Some(ObjectSchema {
            full_path: part.as_str().to_string(),
            nullable: false,
            properties: self.properties,
            required: self.required,
            additional_properties: false,
        })
    }
}

fn compile_parameters(
    key: &str,
    params: &[Value],
) -> Result<(Option<ObjectSchema>, Option<ObjectSchema>), CompileError> {
    let mut path_group = ParamGroup::default();
    let mut query_group = ParamGroup::default();

    for entry in params {
        let invalid = |name: &str, reason: String| CompileError::InvalidParameter {
            endpoint: key.to_string(),
            name: name.to_string(),
            reason,
        };

        let param = entry
            .as_object()
            .ok_or_else(|| invalid("", "entry must be an object".to_string()))?;
        let name = param
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| invalid("", "must declare a non-empty name".to_string()))?;

        let (part, group) = match param.get("in").and_then(Value::as_str) {
            Some("path") => (RequestPart::PathParams, &mut path_group),
            Some("query") => (RequestPart::QueryParams, &mut query_group),
            Some(other) => {
                return Err(invalid(name, format!("has unsupported location '{other}'")));
            }
            None => return Err(invalid(name, "must declare 'in'".to_string())),
        };

        if group.properties.contains_key(name) {
            return Err(invalid(
                name,
                format!("is declared more than once in {}", part.as_str()),
            ));
        }

        let required = param.get("required") == Some(&Value::Bool(true));
        if part == RequestPart::PathParams && !required {
            return Err(invalid(name, "must be declared with required: true".to_string()));
        }

        let schema_value = param
            .get("schema")
            .filter(|s| s.is_object())
            .ok_or_else(|| invalid(name, "must declare a schema object".to_string()))?;
        let full_path = format!("{}.{}", part.as_str(), name);

        let compiled = match schema_value.get("type").and_then(Value::as_str) {
            Some("object") => {
                return Err(invalid(name, "must not be of type 'object'".to_string()));
            }
            Some("array") if part == RequestPart::PathParams => {
                return Err(invalid(name, "must not be of type 'array'".to_string()));
            }
            Some("array") => {
                let pipe_delimited = param.get("explode") == Some(&Value::Bool(false))
                    && param.get("style").and_then(Value::as_str) == Some("pipeDelimited");
                if !pipe_delimited {
                    return Err(invalid(
                        name,
                        "of type 'array' requires explode: false and style: pipeDelimited"
                            .to_string(),
                    ));
                }
                let schema = schema_value.as_object().ok_or_else(|| {
                    invalid(name, "must declare a schema object".to_string())
                })?;
                let array = compile_array(key, schema, full_path, true)?;
                if !matches!(
                    *array.item_schema,
                    ValidationSchema::String(_) | ValidationSchema::Integer(_)
                ) {
                    return Err(invalid(
                        name,
                        "pipe-delimited items must be of type 'string' or 'integer'".to_string(),
                    ));
                }
                ValidationSchema::Array(array)
            }
            _ => compile_by_type(key, schema_value, full_path)?,
        };

        group.properties.insert(name.to_string(), compiled);
        if required {
            group.required.push(name.to_string());
        }
    }

    Ok((
        path_group.into_schema(RequestPart::PathParams),
        query_group.into_schema(RequestPart::QueryParams),
    ))
}

fn check_path_params(
    key: &str,
    names: &[String],
    schema: Option<&ObjectSchema>,
) -> Result<(), CompileError> {
    let declared: Vec<&str> = schema
        .map(|s| s.properties.keys().map(String::as_str).collect())
        .unwrap_or_default();

    if let Some(missing) = names.iter().find(|n| !declared.contains(&n.as_str())) {
        return Err(CompileError::PathParamMismatch {
            endpoint: key.to_string(),
            name: missing.clone(),
            declared_in_path: true,
        });
    }
    if let Some(extra) = declared.iter().find(|d| !names.iter().any(|n| n == *d)) {
        return Err(CompileError::PathParamMismatch {
            endpoint: key.to_string(),
            name: (*extra).to_string(),
            declared_in_path: false,
        });
    }
    Ok(())
}

fn invalid_schema(key: &str, schema_path: &str, reason: impl Into<String>) -> CompileError {
    CompileError::InvalidSchema {
        endpoint: key.to_string(),
        schema_path: schema_path.to_string(),
        reason: reason.into(),
    }
}

/// Compile a raw schema node by its declared `type`
///
/// Dispatches to one of the four [`ValidationSchema`] variants and recurses
/// into `items` and `properties`.
///
/// # Errors
///
/// Any type other than `string`, `integer`, `array` or `object`, or any
/// malformed keyword, is a [`CompileError::InvalidSchema`] naming `full_path`.
pub fn compile_by_type(
    key: &str,
    schema: &Value,
    full_path: String,
) -> Result<ValidationSchema, CompileError> {
    let obj = schema
        .as_object()
        .ok_or_else(|| invalid_schema(key, &full_path, "must be an object"))?;

    match obj.get("type") {
        Some(Value::String(t)) if t == "string" => {
            compile_string(key, obj, full_path).map(ValidationSchema::String)
        }
        Some(Value::String(t)) if t == "integer" => {
            compile_integer(key, obj, full_path).map(ValidationSchema::Integer)
        }
        Some(Value::String(t)) if t == "array" => {
            compile_array(key, obj, full_path, false).map(ValidationSchema::Array)
        }
        Some(Value::String(t)) if t == "object" => {
            compile_object(key, obj, full_path).map(ValidationSchema::Object)
        }
        Some(other) => Err(invalid_schema(
            key,
            &full_path,
            format!("has unsupported type {other}"),
        )),
        None => Err(invalid_schema(key, &full_path, "does not declare a type")),
    }
}

fn read_nullable(key: &str, obj: &Map<String, Value>, full_path: &str) -> Result<bool, CompileError> {
    match obj.get("nullable") {
        None => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(invalid_schema(key, full_path, "has a non-boolean 'nullable'")),
    }
}

fn compile_string(
    key: &str,
    obj: &Map<String, Value>,
    full_path: String,
) -> Result<StringSchema, CompileError> {
    let nullable = read_nullable(key, obj, &full_path)?;

    let enum_values = match obj.get("enum") {
        None => None,
        Some(Value::Array(values)) if !values.is_empty() => {
            let mut set = IndexSet::with_capacity(values.len());
            for v in values {
                let s = v.as_str().ok_or_else(|| {
                    invalid_schema(key, &full_path, "has a non-string 'enum' member")
                })?;
                set.insert(s.to_string());
            }
            Some(set)
        }
        Some(_) => {
            return Err(invalid_schema(
                key,
                &full_path,
                "has an 'enum' that is not a non-empty array of strings",
            ));
        }
    };

    let min_length = match obj.get("minLength") {
        None => None,
        Some(v) => Some(v.as_u64().ok_or_else(|| {
            invalid_schema(key, &full_path, "has a 'minLength' that is not a non-negative integer")
        })?),
    };

    Ok(StringSchema {
        full_path,
        nullable,
        enum_values,
        min_length,
    })
}

fn compile_integer(
    key: &str,
    obj: &Map<String, Value>,
    full_path: String,
) -> Result<IntegerSchema, CompileError> {
    let nullable = read_nullable(key, obj, &full_path)?;
    let bound = |name: &str| -> Result<Option<i64>, CompileError> {
        match obj.get(name) {
            None => Ok(None),
            Some(v) => v.as_i64().map(Some).ok_or_else(|| {
                invalid_schema(key, &full_path, format!("has a '{name}' that is not an integer"))
            }),
        }
    };
    let minimum = bound("minimum")?;
    let maximum = bound("maximum")?;

    Ok(IntegerSchema {
        full_path,
        nullable,
        minimum,
        maximum,
    })
}

fn compile_array(
    key: &str,
    obj: &Map<String, Value>,
    full_path: String,
    pipe_delimited: bool,
) -> Result<ArraySchema, CompileError> {
    let nullable = read_nullable(key, obj, &full_path)?;

    let items = obj
        .get("items")
        .ok_or_else(|| invalid_schema(key, &full_path, "does not declare 'items'"))?;
    let item_schema = compile_by_type(key, items, format!("{full_path}.items"))?;

    let min_items = match obj.get("minItems") {
        None => None,
        Some(v) => Some(v.as_u64().filter(|n| *n > 0).ok_or_else(|| {
            invalid_schema(key, &full_path, "has a 'minItems' that is not a positive integer")
        })?),
    };

    Ok(ArraySchema {
        full_path,
        nullable,
        item_schema: Box::new(item_schema),
        min_items,
        pipe_delimited,
    })
}

fn compile_object(
    key: &str,
    obj: &Map<String, Value>,
    full_path: String,
) -> Result<ObjectSchema, CompileError> {
    let nullable = read_nullable(key, obj, &full_path)?;

    let mut properties = IndexMap::new();
    match obj.get("properties") {
        None => {}
        Some(Value::Object(props)) => {
            for (name, prop) in props {
                let compiled = compile_by_type(key, prop, format!("{full_path}.{name}"))?;
                properties.insert(name.clone(), compiled);
            }
        }
        Some(_) => {
            return Err(invalid_schema(key, &full_path, "has a 'properties' that is not an object"));
        }
    }

    let additional_properties = obj.get("additionalProperties") != Some(&Value::Bool(false));
    if !additional_properties && properties.is_empty() {
        return Err(invalid_schema(
            key,
            &full_path,
            "sets additionalProperties: false but declares no properties",
        ));
    }

    let mut required = Vec::new();
    match obj.get("required") {
        None => {}
        Some(Value::Array(names)) => {
            for n in names {
                let name = n.as_str().ok_or_else(|| {
                    invalid_schema(key, &full_path, "has a non-string 'required' entry")
                })?;
                if !properties.contains_key(name) {
                    return Err(invalid_schema(
                        key,
                        &full_path,
                        format!("lists required property '{name}' that is not declared"),
                    ));
                }
                if !required.iter().any(|r: &String| r == name) {
                    required.push(name.to_string());
                }
            }
        }
        Some(_) => {
            return Err(invalid_schema(key, &full_path, "has a 'required' that is not an array"));
        }
    }

    Ok(ObjectSchema {
        full_path,
        nullable,
        properties,
        required,
        additional_properties,
    })
}

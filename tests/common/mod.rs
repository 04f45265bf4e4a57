#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Writes `content` to a fresh temp file with the given extension.
    /// The file is removed when the handle is dropped.
    pub fn create_temp_spec(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("apicontract_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .expect("failed to create temp spec");
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        create_temp_spec(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> NamedTempFile {
        create_temp_spec(content, "json")
    }
}

pub mod specs {
    /// Small pet store contract covering every part and schema kind.
    pub const PET_STORE: &str = r#"
openapi: 3.0.3
info:
  title: Pet Store
  version: '1.0'
paths:
  /pets:
    get:
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            minimum: 1
            maximum: 50
        - name: status
          in: query
          schema:
            $ref: '#/components/schemas/Status'
        - name: tags
          in: query
          explode: false
          style: pipeDelimited
          schema:
            type: array
            minItems: 1
            items:
              type: string
    post:
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/NewPet'
  /pets/mine:
    get: {}
  /pets/{petId}:
    get:
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: integer
            minimum: 1
    delete:
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: integer
  /owners/{ownerId}/pets/{petId}:
    put:
      parameters:
        - name: ownerId
          in: path
          required: true
          schema:
            type: string
            minLength: 3
        - name: petId
          in: path
          required: true
          schema:
            type: integer
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/NewPet'
components:
  schemas:
    Status:
      type: string
      enum: [available, pending, sold]
    NewPet:
      type: object
      required: [name]
      additionalProperties: false
      properties:
        name:
          type: string
          minLength: 1
        status:
          $ref: '#/components/schemas/Status'
        age:
          type: integer
          minimum: 0
          nullable: true
        tags:
          type: array
          items:
            type: string
"#;
}

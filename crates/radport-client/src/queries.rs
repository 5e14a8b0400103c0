//! GraphQL documents sent to the portal backend.

/// All cases visible to the session's user. Field: [`GET_CASES_FIELD`].
pub const GET_CASES: &str = r#"
  query GetCases {
    getCases {
      id
      pacienteId
      pacienteNombre
      pacienteEmail
      fechaSubida
      estado
      urlRadiografia
      resultados {
        probNeumonia
        etiqueta
        fechaProcesamiento
      }
      doctorAsignado
    }
  }
"#;

pub const GET_CASES_FIELD: &str = "getCases";

/// One prediagnostic by id. Variables: `{ "id": ID! }`.
pub const GET_PREDIAGNOSTIC: &str = r#"
  query GetPreDiagnostic($id: ID!) {
    getPreDiagnostic(id: $id) {
      prediagnostic_id
      pacienteId
      estado
      urlrad
      resultadosModelo {
        probNeumonia
        etiqueta
      }
      fechaSubida
    }
  }
"#;

pub const GET_PREDIAGNOSTIC_FIELD: &str = "getPreDiagnostic";

/// Record a doctor's decision.
/// Variables: `{ "id_prediagnostico": ID!, "input": DiagnosticInput! }`.
pub const CREATE_DIAGNOSTIC: &str = r#"
  mutation CreateDiagnostic($id_prediagnostico: ID!, $input: DiagnosticInput!) {
    createDiagnostic(
      id_prediagnostico: $id_prediagnostico
      input: $input
    ) {
      message
      success
    }
  }
"#;

pub const CREATE_DIAGNOSTIC_FIELD: &str = "createDiagnostic";

/// Multipart upload of a radiograph; the file travels as variable `file`.
pub const UPLOAD_IMAGE: &str = "mutation uploadImage($file: Upload!) {\n  uploadImage(imagen: $file)\n}";

pub const UPLOAD_IMAGE_FIELD: &str = "uploadImage";

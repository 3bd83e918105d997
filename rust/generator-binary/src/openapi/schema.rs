//! Object and list schema entries for one resource version.

use serde_json::{json, Map, Value};

use super::names::ResourceNames;

pub const LIST_META_REF: &str =
    "#/components/schemas/io.k8s.apimachinery.pkg.apis.meta.v1.ListMeta";

const API_VERSION_DESC: &str = "APIVersion defines the versioned schema of this representation of an object. Servers should convert recognized schemas to the latest internal value, and may reject unrecognized values. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#resources";
const KIND_DESC: &str = "Kind is a string value representing the REST resource this object represents. Servers may infer this from the endpoint the client submits requests to. Cannot be updated. In CamelCase. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#types-kinds";
const LIST_META_DESC: &str = "Standard list metadata. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md#types-kinds";

pub fn schema_ref(key: &str) -> String {
    format!("#/components/schemas/{key}")
}

/// The schema entry for the resource itself. `description` and
/// `properties` come from the CRD fragment, description already hoisted
/// out by the caller.
pub(super) fn object_schema(
    names: &ResourceNames,
    description: String,
    properties: Map<String, Value>,
) -> Value {
    json!({
        "description": description,
        "properties": properties,
        "type": "object",
        "x-kubernetes-gvk": {
            "group": names.group,
            "version": names.version,
            "kind": names.kind,
        },
    })
}

/// The standard Kubernetes List wrapper around the object schema.
pub(super) fn list_schema(names: &ResourceNames) -> Value {
    json!({
        "description": format!("a list of {} resources", names.object_key),
        "properties": {
            "apiVersion": {
                "description": API_VERSION_DESC,
                "type": "string",
            },
            "items": {
                "description": format!(
                    "List of {}. More info: https://git.k8s.io/community/contributors/devel/sig-architecture/api-conventions.md",
                    names.plural
                ),
                "items": {
                    "$ref": schema_ref(&names.object_key),
                },
                "type": "array",
            },
            "kind": {
                "description": KIND_DESC,
                "type": "string",
            },
            "metadata": {
                "allOf": [
                    { "$ref": LIST_META_REF },
                ],
                "description": LIST_META_DESC,
            },
        },
        "type": "object",
        "required": ["items"],
        "x-kubernetes-gvk": {
            "group": names.group,
            "version": names.version,
            "kind": format!("{}List", names.kind),
        },
    })
}

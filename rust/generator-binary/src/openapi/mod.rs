//! The accumulating OpenAPI document and the per-version synthesis.

mod names;
mod paths;
mod schema;

use std::sync::LazyLock;

use serde_json::{json, Map, Value};
use snafu::{ensure, OptionExt, Snafu};

use crate::crd::{CrdVersion, ResourceDescriptor};
use names::ResourceNames;

/// Well-known Kubernetes meta schemas (ObjectMeta, ListMeta, Status,
/// DeleteOptions, ...) every document is seeded with.
static META_SCHEMAS: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../../assets/meta-schemas.json"))
        .expect("embedded meta-schema asset is valid JSON")
});

/// Reasons a single version is skipped. A skip never aborts the run;
/// sibling versions and other files are still processed.
#[derive(Snafu, Debug)]
pub enum Error {
    #[snafu(display("cannot parse version for group '{group}', kind '{kind}'"))]
    MissingVersionName { group: String, kind: String },

    #[snafu(display(
        "data already exists for group '{group}', kind '{kind}', version '{version}'"
    ))]
    DuplicateSchemaKey {
        group: String,
        kind: String,
        version: String,
    },

    #[snafu(display("no schema data for group '{group}', kind '{kind}', version '{version}'"))]
    MissingSchema {
        group: String,
        kind: String,
        version: String,
    },

    #[snafu(display(
        "schema for group '{group}', kind '{kind}', version '{version}' declares no properties"
    ))]
    NoProperties {
        group: String,
        kind: String,
        version: String,
    },
}

pub struct Document {
    root: Value,
}

impl Document {
    pub fn new(title: &str, description: &str, version: &str) -> Self {
        Self {
            root: json!({
                "openapi": "3.0.3",
                "info": {
                    "description": description,
                    "title": title,
                    "version": version,
                },
                "components": {
                    "schemas": META_SCHEMAS.clone(),
                },
                "paths": {},
            }),
        }
    }

    /// Registers the object schema, the list schema and the four path
    /// items for one version of `resource`. Returns the skip reason if
    /// the version cannot be represented; the document is untouched in
    /// that case.
    pub fn add_resource_version(
        &mut self,
        resource: &ResourceDescriptor,
        version: &CrdVersion,
    ) -> Result<(), Error> {
        ensure!(
            !version.name.is_empty(),
            MissingVersionNameSnafu {
                group: resource.group.as_str(),
                kind: resource.kind.as_str(),
            }
        );
        let names = ResourceNames::derive(resource, &version.name);
        ensure!(
            !self.contains_schema(&names.object_key),
            DuplicateSchemaKeySnafu {
                group: resource.group.as_str(),
                kind: resource.kind.as_str(),
                version: version.name.as_str(),
            }
        );
        let mut fragment = version
            .schema
            .as_ref()
            .and_then(|schema| schema.open_api_v3_schema.clone())
            .filter(|fragment| !fragment.is_empty())
            .context(MissingSchemaSnafu {
                group: resource.group.as_str(),
                kind: resource.kind.as_str(),
                version: version.name.as_str(),
            })?;

        // Hoist the top-level description onto the generated entry.
        let description = match fragment.remove("description") {
            Some(Value::String(description)) => description,
            _ => String::new(),
        };
        let properties = fragment
            .get("properties")
            .and_then(Value::as_object)
            .filter(|properties| !properties.is_empty())
            .cloned()
            .context(NoPropertiesSnafu {
                group: resource.group.as_str(),
                kind: resource.kind.as_str(),
                version: version.name.as_str(),
            })?;

        self.insert_schema(&names.object_key, schema::object_schema(&names, description, properties));
        self.insert_schema(&names.list_key, schema::list_schema(&names));
        for (path, item) in paths::resource_paths(&names) {
            self.insert_path(path, item);
        }
        Ok(())
    }

    pub fn contains_schema(&self, key: &str) -> bool {
        self.schemas().is_some_and(|schemas| schemas.contains_key(key))
    }

    pub fn schema_count(&self) -> usize {
        self.schemas().map_or(0, Map::len)
    }

    pub fn path_count(&self) -> usize {
        self.root["paths"].as_object().map_or(0, Map::len)
    }

    /// Renders the document as pretty JSON with four-space indentation.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(&self.root, &mut serializer)?;
        buf.push(b'\n');
        Ok(buf)
    }

    fn schemas(&self) -> Option<&Map<String, Value>> {
        self.root["components"]["schemas"].as_object()
    }

    fn insert_schema(&mut self, key: &str, entry: Value) {
        if let Some(schemas) = self.root["components"]["schemas"].as_object_mut() {
            schemas.insert(key.to_owned(), entry);
        }
    }

    fn insert_path(&mut self, path: String, item: Value) {
        if let Some(paths) = self.root["paths"].as_object_mut() {
            paths.insert(path, item);
        }
    }

    #[cfg(test)]
    pub fn root(&self) -> &Value {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::crd::CustomResourceDefinition;

    use super::*;

    const WIDGET_CRD: &str = indoc! {r#"
        apiVersion: apiextensions.k8s.io/v1
        kind: CustomResourceDefinition
        metadata:
          name: widgets.widgets.example.com
        spec:
          group: widgets.example.com
          names:
            kind: Widget
            plural: widgets
          scope: Namespaced
          versions:
            - name: v1
              served: true
              storage: true
              schema:
                openAPIV3Schema:
                  description: Widget is a widget.
                  type: object
                  properties:
                    spec:
                      type: object
    "#};

    fn document() -> Document {
        Document::new("custom resources api", "generated spec", "1.0.0")
    }

    fn add_crd(document: &mut Document, input: &str) -> Vec<Result<(), Error>> {
        let crd: CustomResourceDefinition =
            serde_yaml::from_str(input).expect("illegal test input");
        let resource = crd.descriptor().expect("valid manifest");
        crd.spec
            .versions
            .iter()
            .map(|version| document.add_resource_version(&resource, version))
            .collect()
    }

    #[test]
    fn test_seed_contains_meta_schemas() {
        let document = document();
        for key in [
            "io.k8s.apimachinery.pkg.apis.meta.v1.ObjectMeta",
            "io.k8s.apimachinery.pkg.apis.meta.v1.ListMeta",
            "io.k8s.apimachinery.pkg.apis.meta.v1.OwnerReference",
            "io.k8s.apimachinery.pkg.apis.meta.v1.Status",
            "io.k8s.apimachinery.pkg.apis.meta.v1.DeleteOptions",
            "io.k8s.apimachinery.pkg.apis.meta.v1.Patch",
            "io.k8s.apimachinery.pkg.apis.meta.v1.Time",
        ] {
            assert!(document.contains_schema(key), "missing seed schema {key}");
        }
        assert_eq!(document.schema_count(), 12);
        assert_eq!(document.path_count(), 0);
        assert_eq!(document.root()["openapi"], "3.0.3");
        assert_eq!(document.root()["info"]["version"], "1.0.0");
    }

    #[test]
    fn test_widget_scenario() {
        let mut document = document();
        for result in add_crd(&mut document, WIDGET_CRD) {
            result.expect("widget version registers");
        }

        assert!(document.contains_schema("widgets.example.com.widget.v1"));
        assert!(document.contains_schema("widgets.example.com.widgetList.v1"));
        assert_eq!(document.schema_count(), 14);

        let object = &document.root()["components"]["schemas"]["widgets.example.com.widget.v1"];
        assert_eq!(object["description"], "Widget is a widget.");
        assert_eq!(
            object["x-kubernetes-gvk"],
            json!({"group": "widgets.example.com", "version": "v1", "kind": "Widget"})
        );
        assert!(object["properties"]["spec"].is_object());
        // the hoisted description must not remain nested
        assert!(object["properties"].get("description").is_none());

        let list = &document.root()["components"]["schemas"]["widgets.example.com.widgetList.v1"];
        assert_eq!(list["x-kubernetes-gvk"]["kind"], "WidgetList");

        let cluster_list = &document.root()["paths"]["/apis/widgets.example.com/v1/widgets"];
        assert_eq!(
            cluster_list["get"]["operationId"],
            "listWidgetsExampleComV1WidgetForAllNamespaces"
        );
        assert_eq!(document.path_count(), 3);
    }

    #[test]
    fn test_collision_keeps_first_registration() {
        let mut document = document();
        add_crd(&mut document, WIDGET_CRD)[0]
            .as_ref()
            .expect("first registration");
        let before = document.root()["components"]["schemas"]["widgets.example.com.widget.v1"].clone();

        let duplicate = WIDGET_CRD.replace("Widget is a widget.", "an impostor widget");
        let results = add_crd(&mut document, &duplicate);
        assert!(matches!(results[0], Err(Error::DuplicateSchemaKey { .. })));

        let after = &document.root()["components"]["schemas"]["widgets.example.com.widget.v1"];
        assert_eq!(*after, before, "first-registered schema must be preserved");
        assert_eq!(document.schema_count(), 14);
    }

    #[test]
    fn test_missing_schema_skips_version_but_not_siblings() {
        let mut document = document();
        let results = add_crd(
            &mut document,
            indoc! {r#"
                spec:
                  group: widgets.example.com
                  names:
                    kind: Widget
                    plural: widgets
                  versions:
                    - name: v1
                    - name: v2
                      schema:
                        openAPIV3Schema:
                          type: object
                          properties:
                            spec:
                              type: object
            "#},
        );
        assert!(matches!(results[0], Err(Error::MissingSchema { .. })));
        results[1].as_ref().expect("sibling version registers");
        assert!(!document.contains_schema("widgets.example.com.widget.v1"));
        assert!(document.contains_schema("widgets.example.com.widget.v2"));
        assert!(document.contains_schema("widgets.example.com.widgetList.v2"));
    }

    #[test]
    fn test_schema_without_properties_is_skipped() {
        let mut document = document();
        let results = add_crd(
            &mut document,
            indoc! {r#"
                spec:
                  group: widgets.example.com
                  names:
                    kind: Widget
                    plural: widgets
                  versions:
                    - name: v1
                      schema:
                        openAPIV3Schema:
                          description: nothing but a description
                          type: object
            "#},
        );
        assert!(matches!(results[0], Err(Error::NoProperties { .. })));
        assert_eq!(document.schema_count(), 12);
        assert_eq!(document.path_count(), 0);
    }

    #[test]
    fn test_version_without_name_is_skipped() {
        let mut document = document();
        let results = add_crd(
            &mut document,
            indoc! {r#"
                spec:
                  group: widgets.example.com
                  names:
                    kind: Widget
                    plural: widgets
                  versions:
                    - served: true
            "#},
        );
        assert!(matches!(results[0], Err(Error::MissingVersionName { .. })));
    }

    #[test]
    fn test_one_schema_pair_per_version() {
        let mut document = document();
        let results = add_crd(
            &mut document,
            indoc! {r#"
                spec:
                  group: widgets.example.com
                  names:
                    kind: Widget
                    plural: widgets
                  versions:
                    - name: v1
                      schema:
                        openAPIV3Schema:
                          type: object
                          properties:
                            spec:
                              type: object
                    - name: v2beta1
                      schema:
                        openAPIV3Schema:
                          type: object
                          properties:
                            spec:
                              type: object
            "#},
        );
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(Result::is_ok));
        // two object + two list entries on top of the 12 seeded ones
        assert_eq!(document.schema_count(), 16);
        assert_eq!(document.path_count(), 6);
        assert!(document.contains_schema("widgets.example.com.widget.v2beta1"));
        assert_eq!(
            document.root()["paths"]["/apis/widgets.example.com/v2beta1/widgets"]["get"]
                ["operationId"],
            "listWidgetsExampleComV2Beta1WidgetForAllNamespaces"
        );
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let render = || {
            let mut document = document();
            for result in add_crd(&mut document, WIDGET_CRD) {
                result.expect("widget version registers");
            }
            document.to_json_pretty().expect("serializable document")
        };
        assert_eq!(render(), render());
    }
}

//! REST path-item synthesis for one resource version.
//!
//! Every custom resource gets the standard Kubernetes path set: the
//! cluster-wide list, the namespaced collection (list/create/delete
//! collection) and the namespaced item (get/replace/patch/delete). The
//! query-parameter blocks are shared between verbs instead of being
//! spelled out per operation; the emitted field sets are fixed by the
//! Kubernetes API conventions and generated clients depend on them.

use serde_json::{json, Map, Value};

use super::{names::ResourceNames, schema::schema_ref};

const DELETE_OPTIONS_REF: &str =
    "#/components/schemas/io.k8s.apimachinery.pkg.apis.meta.v1.DeleteOptions";
const PATCH_REF: &str = "#/components/schemas/io.k8s.apimachinery.pkg.apis.meta.v1.Patch";
const STATUS_REF: &str = "#/components/schemas/io.k8s.apimachinery.pkg.apis.meta.v1.Status";

const ALLOW_WATCH_BOOKMARKS_DESC: &str = "allowWatchBookmarks requests watch events with type \"BOOKMARK\". Servers that do not implement bookmarks may ignore this flag and bookmarks are sent at the server's discretion. Clients should not assume bookmarks are returned at any specific interval, nor may they assume the server will send any BOOKMARK event during a session. If this is not a watch, this field is ignored.";
const CONTINUE_DESC: &str = "The continue option should be set when retrieving more results from the server. Since this value is server defined, clients may only use the continue value from a previous query result with identical query parameters (except for the value of continue) and the server may reject a continue value it does not recognize. If the specified continue value is no longer valid whether due to expiration (generally five to fifteen minutes) or a configuration change on the server, the server will respond with a 410 ResourceExpired error together with a continue token. If the client needs a consistent list, it must restart their list without the continue field. Otherwise, the client may send another list request with the token received with the 410 error, the server will respond with a list starting from the next key, but from the latest snapshot, which is inconsistent from the previous list results - objects that are created, modified, or deleted after the first list request will be included in the response, as long as their keys are after the \"next key\".\n\nThis field is not supported when watch is true. Clients may start a watch from the last resourceVersion value returned by the server and not miss any modifications.";
const FIELD_SELECTOR_DESC: &str =
    "A selector to restrict the list of returned objects by their fields. Defaults to everything.";
const LABEL_SELECTOR_DESC: &str =
    "A selector to restrict the list of returned objects by their labels. Defaults to everything.";
const LIMIT_DESC: &str = "limit is a maximum number of responses to return for a list call. If more items exist, the server will set the `continue` field on the list metadata to a value that can be used with the same initial query to retrieve the next set of results. Setting a limit may return fewer than the requested amount of items (up to zero items) in the event all requested objects are filtered out and clients should only use the presence of the continue field to determine whether more results are available. Servers may choose not to support the limit argument and will return all of the available results. If limit is specified and the continue field is empty, clients may assume that no more results are available. This field is not supported if watch is true.\n\nThe server guarantees that the objects returned when using continue will be identical to issuing a single list call without a limit - that is, no objects created, modified, or deleted after the first request is issued will be included in any subsequent continued requests. This is sometimes referred to as a consistent snapshot, and ensures that a client that is using limit to receive smaller chunks of a very large result can ensure they see all possible objects. If objects are updated during a chunked list the version of the object that was present at the time the first list result was calculated is returned.";
const PRETTY_DESC: &str = "If 'true', then the output is pretty printed.";
const RESOURCE_VERSION_DESC: &str = "resourceVersion sets a constraint on what resource versions a request may be served from. See https://kubernetes.io/docs/reference/using-api/api-concepts/#resource-versions for details.\n\nDefaults to unset";
const RESOURCE_VERSION_MATCH_DESC: &str = "resourceVersionMatch determines how resourceVersion is applied to list calls. It is highly recommended that resourceVersionMatch be set for list calls where resourceVersion is set See https://kubernetes.io/docs/reference/using-api/api-concepts/#resource-versions for details.\n\nDefaults to unset";
const TIMEOUT_SECONDS_DESC: &str = "Timeout for the list/watch call. This limits the duration of the call, regardless of any activity or inactivity.";
const WATCH_DESC: &str = "Watch for changes to the described resources and return them as a stream of add, update, and remove notifications. Specify resourceVersion.";

const DRY_RUN_DESC: &str = "When present, indicates that modifications should not be persisted. An invalid or unrecognized dryRun directive will result in an error response and no further processing of the request. Valid values are: - All: all dry run stages will be processed";
const FIELD_MANAGER_DESC: &str = "fieldManager is a name associated with the actor or entity that is making these changes. The value must be less than or 128 characters long, and only contain printable characters, as defined by https://golang.org/pkg/unicode/#IsPrint.";
const FIELD_VALIDATION_DESC: &str = "fieldValidation instructs the server on how to handle objects in the request (POST/PUT/PATCH) containing unknown or duplicate fields, provided that the `ServerSideFieldValidation` feature gate is also enabled. Valid values are: - Ignore: This will ignore any unknown fields that are silently dropped from the object, and will ignore all but the last duplicate field that the decoder encounters. This is the default behavior prior to v1.23 and is the default behavior when the `ServerSideFieldValidation` feature gate is disabled. - Warn: This will send a warning via the standard warning response header for each unknown field that is dropped from the object, and for each duplicate field that is encountered. The request will still succeed if there are no other errors, and will only persist the last of any duplicate fields. This is the default when the `ServerSideFieldValidation` feature gate is enabled. - Strict: This will fail the request with a BadRequest error if any unknown fields would be dropped from the object, or if any duplicate fields are present. The error returned from the server will contain all unknown and duplicate fields encountered.";

const GRACE_PERIOD_SECONDS_DESC: &str = "The duration in seconds before the object should be deleted. Value must be non-negative integer. The value zero indicates delete immediately. If this value is nil, the default grace period for the specified type will be used. Defaults to a per object value if not specified. zero means delete immediately.";
const ORPHAN_DEPENDENTS_DESC: &str = "Deprecated: please use the PropagationPolicy, this field will be deprecated in 1.7. Should the dependent objects be orphaned. If true/false, the \"orphan\" finalizer will be added to/removed from the object's finalizers list. Either this field or PropagationPolicy may be set, but not both.";
const PROPAGATION_POLICY_DESC: &str = "Whether and how garbage collection will be performed. Either this field or OrphanDependents may be set, but not both. The default policy is decided by the existing finalizer set in the metadata.finalizers and the resource-specific default policy. Acceptable values are: 'Orphan' - orphan the dependents; 'Background' - allow the garbage collector to delete the dependents in the background; 'Foreground' - a cascading policy that deletes all dependents in the foreground.";

const NAMESPACE_DESC: &str = "object name and auth scope, such as for teams and projects";

fn query_param(name: &str, ty: &str, description: &str) -> Value {
    json!({
        "description": description,
        "in": "query",
        "name": name,
        "schema": {
            "type": ty,
            "uniqueItems": true,
        },
    })
}

fn path_param(name: &str, description: &str) -> Value {
    json!({
        "description": description,
        "in": "path",
        "name": name,
        "required": true,
        "schema": {
            "type": "string",
            "uniqueItems": true,
        },
    })
}

fn pretty_param() -> Value {
    query_param("pretty", "string", PRETTY_DESC)
}

/// The standard list/watch query-parameter block (without `pretty`,
/// which rides at path level where applicable).
fn watch_list_params() -> Vec<Value> {
    vec![
        query_param("allowWatchBookmarks", "boolean", ALLOW_WATCH_BOOKMARKS_DESC),
        query_param("continue", "string", CONTINUE_DESC),
        query_param("fieldSelector", "string", FIELD_SELECTOR_DESC),
        query_param("labelSelector", "string", LABEL_SELECTOR_DESC),
        query_param("limit", "integer", LIMIT_DESC),
        query_param("resourceVersion", "string", RESOURCE_VERSION_DESC),
        query_param("resourceVersionMatch", "string", RESOURCE_VERSION_MATCH_DESC),
        query_param("timeoutSeconds", "integer", TIMEOUT_SECONDS_DESC),
        query_param("watch", "boolean", WATCH_DESC),
    ]
}

/// Path-level parameters of the cluster-wide list: the watch/list block
/// with `pretty` slotted between `limit` and `resourceVersion`.
fn cluster_list_params() -> Vec<Value> {
    let mut params = watch_list_params();
    params.insert(5, pretty_param());
    params
}

/// Query parameters shared by create, patch and replace.
fn mutation_params() -> Vec<Value> {
    vec![
        query_param("dryRun", "string", DRY_RUN_DESC),
        query_param("fieldManager", "string", FIELD_MANAGER_DESC),
        query_param("fieldValidation", "string", FIELD_VALIDATION_DESC),
    ]
}

fn delete_params() -> Vec<Value> {
    vec![
        query_param("dryRun", "string", DRY_RUN_DESC),
        query_param("gracePeriodSeconds", "integer", GRACE_PERIOD_SECONDS_DESC),
        query_param("orphanDependents", "boolean", ORPHAN_DEPENDENTS_DESC),
        query_param("propagationPolicy", "string", PROPAGATION_POLICY_DESC),
    ]
}

fn json_yaml_content(reference: &str) -> Value {
    json!({
        "application/json": { "schema": { "$ref": reference } },
        "application/yaml": { "schema": { "$ref": reference } },
    })
}

fn patch_content() -> Value {
    json!({
        "application/apply-patch+yaml": { "schema": { "$ref": PATCH_REF } },
        "application/json-patch+json": { "schema": { "$ref": PATCH_REF } },
        "application/merge-patch+json": { "schema": { "$ref": PATCH_REF } },
    })
}

/// Response map referencing `reference` for each `(code, description)`
/// pair, plus the standard 401.
fn ref_responses(reference: &str, codes: &[(&str, &str)]) -> Value {
    let mut responses = Map::new();
    for (code, description) in codes {
        responses.insert(
            (*code).to_owned(),
            json!({
                "content": json_yaml_content(reference),
                "description": description,
            }),
        );
    }
    responses.insert("401".to_owned(), json!({ "description": "Unauthorized" }));
    Value::Object(responses)
}

fn operation(
    description: String,
    operation_id: String,
    parameters: Vec<Value>,
    request_body: Option<Value>,
    responses: Value,
) -> Value {
    let mut op = Map::new();
    op.insert("description".to_owned(), Value::String(description));
    op.insert("operationId".to_owned(), Value::String(operation_id));
    if !parameters.is_empty() {
        op.insert("parameters".to_owned(), Value::Array(parameters));
    }
    if let Some(body) = request_body {
        op.insert("requestBody".to_owned(), json!({ "content": body }));
    }
    op.insert("responses".to_owned(), responses);
    op.insert("tags".to_owned(), json!([]));
    Value::Object(op)
}

/// All four path items for one resource version, keyed by path template.
pub(super) fn resource_paths(names: &ResourceNames) -> Vec<(String, Value)> {
    let ResourceNames {
        group,
        version,
        plural,
        group_camel,
        version_title,
        kind_title,
        ..
    } = names;
    let object_ref = schema_ref(&names.object_key);
    let list_ref = schema_ref(&names.list_key);

    let cluster_list = json!({
        "get": operation(
            format!("list objects of kind {kind_title}"),
            format!("list{group_camel}{version_title}{kind_title}ForAllNamespaces"),
            Vec::new(),
            None,
            ref_responses(&list_ref, &[("200", "OK")]),
        ),
        "parameters": cluster_list_params(),
    });

    let collection = json!({
        "delete": operation(
            format!("delete collection of {kind_title}"),
            format!("delete{group_camel}{version_title}CollectionNamespaced{kind_title}"),
            watch_list_params(),
            None,
            ref_responses(STATUS_REF, &[("200", "OK")]),
        ),
        "get": operation(
            format!("list objects of kind {kind_title}"),
            format!("list{group_camel}{version_title}Namespaced{kind_title}"),
            watch_list_params(),
            None,
            ref_responses(&list_ref, &[("200", "OK")]),
        ),
        "post": operation(
            format!("create a {kind_title}"),
            format!("create{group_camel}{version_title}Namespaced{kind_title}"),
            mutation_params(),
            Some(json_yaml_content(&object_ref)),
            ref_responses(
                &object_ref,
                &[("200", "OK"), ("201", "Created"), ("202", "Accepted")],
            ),
        ),
        "parameters": [
            path_param("namespace", NAMESPACE_DESC),
            pretty_param(),
        ],
    });

    let item = json!({
        "delete": operation(
            format!("delete a {kind_title}"),
            format!("delete{group_camel}{version_title}Namespaced{kind_title}"),
            delete_params(),
            Some(json_yaml_content(DELETE_OPTIONS_REF)),
            ref_responses(STATUS_REF, &[("200", "OK"), ("202", "Accepted")]),
        ),
        "get": operation(
            format!("read the specified {kind_title}"),
            format!("read{group_camel}{version_title}Namespaced{kind_title}"),
            vec![query_param("resourceVersion", "string", RESOURCE_VERSION_DESC)],
            None,
            ref_responses(&object_ref, &[("200", "OK")]),
        ),
        "patch": operation(
            format!("partially update the specified {kind_title}"),
            format!("patch{group_camel}{version_title}Namespaced{kind_title}"),
            mutation_params(),
            Some(patch_content()),
            ref_responses(&object_ref, &[("200", "OK")]),
        ),
        "put": operation(
            format!("replace the specified {kind_title}"),
            format!("replace{group_camel}{version_title}Namespaced{kind_title}"),
            mutation_params(),
            Some(json_yaml_content(&object_ref)),
            ref_responses(&object_ref, &[("200", "OK"), ("201", "Created")]),
        ),
        "parameters": [
            path_param("name", &format!("name of the {kind_title}")),
            path_param("namespace", NAMESPACE_DESC),
            pretty_param(),
        ],
    });

    vec![
        (format!("/apis/{group}/{version}/{plural}"), cluster_list),
        (
            format!("/apis/{group}/{version}/namespaces/{{namespace}}/{plural}"),
            collection,
        ),
        (
            format!("/apis/{group}/{version}/namespaces/{{namespace}}/{plural}/{{name}}"),
            item,
        ),
    ]
}

use crate::crd::ResourceDescriptor;

/// All derived identifiers for one (group, kind, version) triple.
///
/// The camel/title tokens feed the `operationId` strings and must stay
/// stable; generated clients key on them.
pub struct ResourceNames {
    pub group: String,
    pub version: String,
    pub kind: String,
    pub plural: String,
    /// Schema key of the object entry, `{group}.{kind}.{version}` (lowercased kind/version).
    pub object_key: String,
    /// Schema key of the list wrapper, `{group}.{kind}List.{version}`.
    pub list_key: String,
    pub group_camel: String,
    pub version_title: String,
    pub kind_title: String,
}

impl ResourceNames {
    pub fn derive(resource: &ResourceDescriptor, version: &str) -> Self {
        let kind_lower = resource.kind.to_lowercase();
        let version_lower = version.to_lowercase();
        Self {
            object_key: format!("{}.{}.{}", resource.group, kind_lower, version_lower),
            list_key: format!("{}.{}List.{}", resource.group, kind_lower, version_lower),
            group_camel: resource.group.split(['.', '-']).map(title_case).collect(),
            version_title: title_case(version),
            kind_title: title_case(&resource.kind),
            group: resource.group.clone(),
            version: version.to_owned(),
            kind: resource.kind.clone(),
            plural: resource.plural.clone(),
        }
    }
}

/// Title-cases a token: letters are uppercased at the start of each
/// alphabetic run and lowercased otherwise, so `v1alpha1` becomes
/// `V1Alpha1` and `ImageRequest` becomes `Imagerequest`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alphabetic = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if prev_alphabetic {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alphabetic = true;
        } else {
            out.push(ch);
            prev_alphabetic = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("v1", "V1")]
    #[case("v1alpha1", "V1Alpha1")]
    #[case("v2beta1", "V2Beta1")]
    #[case("Widget", "Widget")]
    #[case("ImageRequest", "Imagerequest")]
    #[case("", "")]
    fn test_title_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(title_case(input), expected);
    }

    #[test]
    fn test_derive_widget_names() {
        let resource = ResourceDescriptor {
            group: "widgets.example.com".to_owned(),
            kind: "Widget".to_owned(),
            plural: "widgets".to_owned(),
        };
        let names = ResourceNames::derive(&resource, "v1");
        assert_eq!(names.object_key, "widgets.example.com.widget.v1");
        assert_eq!(names.list_key, "widgets.example.com.widgetList.v1");
        assert_eq!(names.group_camel, "WidgetsExampleCom");
        assert_eq!(names.version_title, "V1");
        assert_eq!(names.kind_title, "Widget");
    }

    #[test]
    fn test_derive_keys_lowercase_kind_and_version() {
        let resource = ResourceDescriptor {
            group: "acme.dev".to_owned(),
            kind: "FunkyThing".to_owned(),
            plural: "funkythings".to_owned(),
        };
        let names = ResourceNames::derive(&resource, "V1Beta2");
        assert_eq!(names.object_key, "acme.dev.funkything.v1beta2");
        assert_eq!(names.list_key, "acme.dev.funkythingList.v1beta2");
        // gvk keeps the declared spelling
        assert_eq!(names.kind, "FunkyThing");
        assert_eq!(names.version, "V1Beta2");
    }
}

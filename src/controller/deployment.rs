//! # Manifest Rendering
//!
//! Builds the Deployment and Service of a registry from its configuration
//! store. Rendering only reads the store, so it must run after
//! [`Configuration::update`].

use crate::constants::{APP_LABEL, REGISTRY_CONTAINER_NAME, REGISTRY_HTTP_PORT};
use crate::controller::configuration::{ConfigKey, Configuration};
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, ResourceRequirements, Service,
    ServicePort, ServiceSpec,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta, OwnerReference};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeMap;

pub fn deployment_name(registry_name: &str) -> String {
    format!("{registry_name}-deployment")
}

pub fn service_name(registry_name: &str) -> String {
    format!("{registry_name}-service")
}

/// Labels shared by the pods, the Deployment selector and the Service selector
pub fn selector_labels(registry_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), registry_name.to_string())])
}

fn object_meta(name: String, configuration: &Configuration, owner: Option<&OwnerReference>) -> ObjectMeta {
    let registry_name = configuration.spec_name();
    let namespace = configuration.spec_namespace();
    ObjectMeta {
        name: Some(name),
        namespace: (!namespace.is_empty()).then_some(namespace),
        labels: Some(selector_labels(&registry_name)),
        owner_references: owner.map(|owner| vec![owner.clone()]),
        ..Default::default()
    }
}

fn resource_requirements(configuration: &Configuration) -> ResourceRequirements {
    let quantity = |key| Quantity(configuration.get_config(key).to_string());
    ResourceRequirements {
        requests: Some(BTreeMap::from([
            ("cpu".to_string(), quantity(ConfigKey::CpuRequests)),
            ("memory".to_string(), quantity(ConfigKey::MemoryRequests)),
        ])),
        limits: Some(BTreeMap::from([
            ("cpu".to_string(), quantity(ConfigKey::CpuLimit)),
            ("memory".to_string(), quantity(ConfigKey::MemoryLimit)),
        ])),
        ..Default::default()
    }
}

/// Render the registry Deployment
pub fn render_deployment(configuration: &Configuration, owner: Option<&OwnerReference>) -> Deployment {
    let registry_name = configuration.spec_name();
    let labels = selector_labels(&registry_name);

    let container = Container {
        name: REGISTRY_CONTAINER_NAME.to_string(),
        image: Some(configuration.image()),
        env: Some(configuration.env()),
        ports: Some(vec![ContainerPort {
            container_port: REGISTRY_HTTP_PORT,
            name: Some("http".to_string()),
            ..Default::default()
        }]),
        resources: Some(resource_requirements(configuration)),
        ..Default::default()
    };

    Deployment {
        metadata: object_meta(deployment_name(&registry_name), configuration, owner),
        spec: Some(DeploymentSpec {
            replicas: Some(configuration.get_config_i32(ConfigKey::Replicas)),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Render the ClusterIP Service in front of the registry pods
pub fn render_service(configuration: &Configuration, owner: Option<&OwnerReference>) -> Service {
    let registry_name = configuration.spec_name();

    Service {
        metadata: object_meta(service_name(&registry_name), configuration, owner),
        spec: Some(ServiceSpec {
            selector: Some(selector_labels(&registry_name)),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: REGISTRY_HTTP_PORT,
                target_port: Some(IntOrString::Int(REGISTRY_HTTP_PORT)),
                protocol: Some("TCP".to_string()),
                ..Default::default()
            }]),
            type_: Some("ClusterIP".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

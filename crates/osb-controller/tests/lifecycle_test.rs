use async_trait::async_trait;
use osb_controller::{
    BrokerController, ControllerError, LifecycleController, Reifier, ReifierError, StagedArtifact,
};
use osb_core::{
    AppConfig, BindingRequest, CreateServiceBindingResponse, CreateServiceInstanceResponse,
    Service, ServiceInstanceRequest, ServicePlan, StagingConfig,
};
use osb_registry::{BlobClient, CatalogResolver, RegistryError, StaticRegistry};
use serde_json::json;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Delegate call as observed by the recording reifier.
#[derive(Debug, Clone, PartialEq)]
enum Call {
    CreateInstance { name: String, chart: Vec<u8> },
    RemoveInstance { name: String },
    CreateBinding { name: String },
    RemoveBinding { name: String },
}

/// Reifier that records calls and fails on request.
#[derive(Default)]
struct RecordingReifier {
    calls: Mutex<Vec<Call>>,
    chart_paths: Mutex<Vec<PathBuf>>,
    fail_names: HashSet<String>,
}

impl RecordingReifier {
    fn failing(names: &[&str]) -> Self {
        Self {
            fail_names: names.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock calls").clone()
    }

    fn chart_paths(&self) -> Vec<PathBuf> {
        self.chart_paths.lock().expect("lock paths").clone()
    }

    fn check(&self, operation: &str, name: &str) -> Result<(), ReifierError> {
        if self.fail_names.contains(name) {
            Err(ReifierError::Failed {
                operation: operation.to_string(),
                name: name.to_string(),
                reason: "injected failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Reifier for RecordingReifier {
    async fn create_service_instance(
        &self,
        name: &str,
        chart_path: &Path,
        _request: &ServiceInstanceRequest,
    ) -> Result<CreateServiceInstanceResponse, ReifierError> {
        let chart = std::fs::read(chart_path).expect("staged chart readable during call");
        self.chart_paths
            .lock()
            .expect("lock paths")
            .push(chart_path.to_path_buf());
        self.calls.lock().expect("lock calls").push(Call::CreateInstance {
            name: name.to_string(),
            chart,
        });
        self.check("create_service_instance", name)?;

        Ok(CreateServiceInstanceResponse {
            dashboard_url: format!("https://dashboard.local/{name}"),
            operation: String::new(),
        })
    }

    async fn remove_service_instance(&self, name: &str) -> Result<(), ReifierError> {
        self.calls.lock().expect("lock calls").push(Call::RemoveInstance {
            name: name.to_string(),
        });
        self.check("remove_service_instance", name)
    }

    async fn create_service_binding(
        &self,
        name: &str,
        _request: &BindingRequest,
    ) -> Result<CreateServiceBindingResponse, ReifierError> {
        self.calls.lock().expect("lock calls").push(Call::CreateBinding {
            name: name.to_string(),
        });
        self.check("create_service_binding", name)?;

        let mut credentials = serde_json::Map::new();
        credentials.insert("host".to_string(), json!(format!("{name}.svc")));
        Ok(CreateServiceBindingResponse { credentials })
    }

    async fn remove_service_binding(&self, name: &str) -> Result<(), ReifierError> {
        self.calls.lock().expect("lock calls").push(Call::RemoveBinding {
            name: name.to_string(),
        });
        self.check("remove_service_binding", name)
    }
}

fn registry() -> StaticRegistry {
    StaticRegistry::new(vec![Service {
        id: "mysql".to_string(),
        name: "mysql".to_string(),
        bindable: true,
        plans: vec![
            ServicePlan {
                id: "small".to_string(),
                metadata: Some(json!({
                    "instanceType": "gs://charts/mysql-1.0.tgz",
                    "bindingType": "gs://charts/mysql-user-1.0.tgz",
                })),
                ..ServicePlan::default()
            },
            ServicePlan {
                id: "legacy".to_string(),
                metadata: None,
                ..ServicePlan::default()
            },
        ],
        ..Service::default()
    }])
}

async fn chart_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/charts/mysql-1.0.tgz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"chart-bytes".to_vec()))
        .mount(&server)
        .await;
    server
}

fn controller(
    server: &MockServer,
    reifier: Arc<RecordingReifier>,
    staging_dir: &Path,
) -> LifecycleController {
    let blobs = BlobClient::with_base_url(format!("{}/", server.uri())).expect("blob client");
    let resolver = CatalogResolver::new(Arc::new(registry()), blobs);
    LifecycleController::new(resolver, reifier).with_staging(StagingConfig {
        prefix: "chart-".to_string(),
        dir: Some(staging_dir.to_path_buf()),
    })
}

fn request(plan_id: &str) -> ServiceInstanceRequest {
    ServiceInstanceRequest {
        service_id: "mysql".to_string(),
        plan_id: plan_id.to_string(),
        ..ServiceInstanceRequest::default()
    }
}

fn staged_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("read staging dir").count()
}

#[tokio::test]
async fn test_create_instance_stages_chart_and_cleans_up() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::default());
    let controller = controller(&server, reifier.clone(), staging.path());

    let response = controller
        .create_service_instance("abc-123-def", &request("small"))
        .await
        .expect("create instance");

    assert_eq!(response.dashboard_url, "https://dashboard.local/cf-i-abc123def");
    assert_eq!(
        reifier.calls(),
        vec![Call::CreateInstance {
            name: "cf-i-abc123def".to_string(),
            chart: b"chart-bytes".to_vec(),
        }]
    );

    let paths = reifier.chart_paths();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].starts_with(staging.path()));
    assert!(!paths[0].exists(), "staged chart must be removed");
    assert_eq!(staged_files(staging.path()), 0);
}

#[tokio::test]
async fn test_create_instance_cleans_up_on_delegate_failure() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::failing(&["cf-i-abc123def"]));
    let controller = controller(&server, reifier.clone(), staging.path());

    let err = controller
        .create_service_instance("abc-123-def", &request("small"))
        .await
        .expect_err("delegate failure");

    assert!(matches!(err, ControllerError::Delegate { resource, .. } if resource == "cf-i-abc123def"));
    assert!(!reifier.chart_paths()[0].exists());
    assert_eq!(staged_files(staging.path()), 0);
}

#[tokio::test]
async fn test_create_instance_chart_download_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::default());
    let controller = controller(&server, reifier.clone(), staging.path());

    let err = controller
        .create_service_instance("abc", &request("small"))
        .await
        .expect_err("download failure");

    assert!(matches!(
        err,
        ControllerError::Registry(RegistryError::Fetch { status: 500, .. })
    ));
    assert!(reifier.calls().is_empty());
    assert_eq!(staged_files(staging.path()), 0);
}

#[tokio::test]
async fn test_create_instance_unknown_plan() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::default());
    let controller = controller(&server, reifier.clone(), staging.path());

    let err = controller
        .create_service_instance("abc", &request("huge"))
        .await
        .expect_err("unknown plan");
    assert!(matches!(
        err,
        ControllerError::Registry(RegistryError::PlanNotFound { .. })
    ));

    let err = controller
        .create_service_instance("abc", &request("legacy"))
        .await
        .expect_err("plan without types");
    assert!(matches!(
        err,
        ControllerError::Registry(RegistryError::NoUsableTypes { .. })
    ));

    assert!(reifier.calls().is_empty());
}

#[tokio::test]
async fn test_get_instance_not_implemented() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let controller = controller(&server, Arc::new(RecordingReifier::default()), staging.path());

    let err = controller
        .get_service_instance("abc")
        .await
        .expect_err("not implemented");
    assert!(matches!(err, ControllerError::NotImplemented { .. }));
}

#[tokio::test]
async fn test_remove_instance_uses_instance_name() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::default());
    let controller = controller(&server, reifier.clone(), staging.path());

    controller
        .remove_service_instance("abc-123")
        .await
        .expect("remove instance");
    assert_eq!(
        reifier.calls(),
        vec![Call::RemoveInstance {
            name: "cf-i-abc123".to_string()
        }]
    );
}

#[tokio::test]
async fn test_remove_instance_failure_propagates() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::failing(&["cf-i-abc123"]));
    let controller = controller(&server, reifier, staging.path());

    let err = controller
        .remove_service_instance("abc-123")
        .await
        .expect_err("delegate failure");
    assert!(matches!(err, ControllerError::Delegate { .. }));
}

#[tokio::test]
async fn test_bind_forwards_instance_name() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::default());
    let controller = controller(&server, reifier.clone(), staging.path());

    let request = BindingRequest {
        service_id: "mysql".to_string(),
        plan_id: "small".to_string(),
        ..BindingRequest::default()
    };
    let response = controller
        .bind("inst-1", "bind-1", &request)
        .await
        .expect("bind");

    assert_eq!(response.credentials["host"], json!("cf-i-inst1.svc"));
    assert_eq!(
        reifier.calls(),
        vec![Call::CreateBinding {
            name: "cf-i-inst1".to_string()
        }]
    );
}

#[tokio::test]
async fn test_unbind_removes_binding_then_proxy() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::default());
    let controller = controller(&server, reifier.clone(), staging.path());

    controller.unbind("inst-1", "bind-1").await.expect("unbind");
    assert_eq!(
        reifier.calls(),
        vec![
            Call::RemoveBinding {
                name: "cf-i-inst1".to_string()
            },
            Call::RemoveInstance {
                name: "cf-b-bind1".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn test_unbind_tolerates_proxy_failure() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::failing(&["cf-b-bind1"]));
    let controller = controller(&server, reifier.clone(), staging.path());

    controller
        .unbind("inst-1", "bind-1")
        .await
        .expect("proxy failure is not fatal");
    assert_eq!(reifier.calls().len(), 2);
}

#[tokio::test]
async fn test_unbind_binding_failure_is_fatal() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let reifier = Arc::new(RecordingReifier::failing(&["cf-i-inst1"]));
    let controller = controller(&server, reifier.clone(), staging.path());

    let err = controller
        .unbind("inst-1", "bind-1")
        .await
        .expect_err("binding removal failure");
    assert!(matches!(err, ControllerError::Delegate { resource, .. } if resource == "cf-i-inst1"));
    // Proxy cleanup is not attempted
    assert_eq!(reifier.calls().len(), 1);
}

fn config_for(server: &MockServer, staging: StagingConfig) -> AppConfig {
    let mut config = AppConfig::default();
    config.blob.base_url = format!("{}/", server.uri());
    config.staging = staging;
    config
}

#[tokio::test]
async fn test_from_config_stages_into_configured_dir() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let config = config_for(
        &server,
        StagingConfig {
            prefix: "osb-chart-".to_string(),
            dir: Some(staging.path().to_path_buf()),
        },
    );

    let reifier = Arc::new(RecordingReifier::default());
    let controller = LifecycleController::from_config(&config, Arc::new(registry()), reifier.clone())
        .expect("controller from config");

    controller
        .create_service_instance("abc", &request("small"))
        .await
        .expect("create instance");

    let paths = reifier.chart_paths();
    assert!(paths[0].starts_with(staging.path()));
    let file_name = paths[0].file_name().and_then(|n| n.to_str()).expect("file name");
    assert!(file_name.starts_with("osb-chart-"), "unexpected file {file_name}");
    assert_eq!(staged_files(staging.path()), 0);
}

#[tokio::test]
async fn test_create_instance_missing_staging_dir() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let missing = staging.path().join("does-not-exist");
    let config = config_for(
        &server,
        StagingConfig {
            prefix: "chart-".to_string(),
            dir: Some(missing.clone()),
        },
    );

    let reifier = Arc::new(RecordingReifier::default());
    let controller = LifecycleController::from_config(&config, Arc::new(registry()), reifier.clone())
        .expect("controller from config");

    let err = controller
        .create_service_instance("abc", &request("small"))
        .await
        .expect_err("staging failure");

    assert!(
        matches!(&err, ControllerError::Staging { locator, .. } if locator == "gs://charts/mysql-1.0.tgz"),
        "unexpected error: {err}"
    );
    assert!(reifier.calls().is_empty());
    assert!(!missing.exists());
}

#[tokio::test]
async fn test_staged_artifact_reports_download_and_removes_file() {
    let server = chart_server().await;
    let staging = tempfile::TempDir::new().expect("staging dir");
    let blobs = BlobClient::with_base_url(format!("{}/", server.uri())).expect("blob client");
    let config = StagingConfig {
        prefix: "chart-".to_string(),
        dir: Some(staging.path().to_path_buf()),
    };

    let chart = StagedArtifact::fetch(&blobs, "gs://charts/mysql-1.0.tgz", &config)
        .await
        .expect("stage chart");
    assert_eq!(chart.locator(), "gs://charts/mysql-1.0.tgz");
    assert_eq!(chart.size(), b"chart-bytes".len() as u64);
    assert_eq!(std::fs::read(chart.path()).expect("read chart"), b"chart-bytes");

    let path = chart.path().to_path_buf();
    drop(chart);
    assert!(!path.exists());
    assert_eq!(staged_files(staging.path()), 0);
}

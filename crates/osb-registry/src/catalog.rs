//! Catalog resolution with schema enrichment.

use crate::blob::BlobClient;
use crate::error::{RegistryError, Result};
use crate::registry::ServiceRegistry;
use crate::types::resolve_types;
use osb_core::{Catalog, Schemas, Types};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Builds the broker catalog from the registry.
///
/// Every plan of every service is enriched with the schemas of its artifact
/// types. Resolution is all-or-nothing: the first plan that fails aborts the
/// whole catalog.
#[derive(Clone)]
pub struct CatalogResolver {
    registry: Arc<dyn ServiceRegistry>,
    blobs: BlobClient,
}

impl CatalogResolver {
    /// Create a resolver over a registry and blob client.
    #[must_use]
    pub fn new(registry: Arc<dyn ServiceRegistry>, blobs: BlobClient) -> Self {
        Self { registry, blobs }
    }

    /// Blob client used for schemas and artifacts.
    #[must_use]
    pub fn blobs(&self) -> &BlobClient {
        &self.blobs
    }

    /// Fetch the catalog and attach schemas to every plan.
    pub async fn catalog(&self) -> Result<Catalog> {
        let mut services = self.registry.services().await.map_err(|e| {
            error!(error = %e, "failed to fetch catalog from service registry");
            e
        })?;

        for service in &mut services {
            for plan in &mut service.plans {
                let resolved = match resolve_types(plan) {
                    Ok(types) => self.schemas(&types).await,
                    Err(e) => Err(e),
                };

                match resolved {
                    Ok(schemas) => plan.schemas = Some(schemas),
                    Err(e) => {
                        error!(
                            service_id = %service.id,
                            plan_id = %plan.id,
                            error = %e,
                            "failed to fetch schemas for plan types"
                        );
                        return Err(e);
                    }
                }
            }
        }

        info!(services = services.len(), "resolved catalog");
        Ok(Catalog { services })
    }

    /// Fetch the schemas for resolved types.
    ///
    /// The binding schema is only fetched for bindable types.
    pub async fn schemas(&self, types: &Types) -> Result<Schemas> {
        let instance = self.blobs.fetch_schema(&types.instance).await?;

        let binding = match types.binding.as_deref() {
            Some(locator) if types.is_bindable() => Some(self.blobs.fetch_schema(locator).await?),
            _ => None,
        };

        Ok(Schemas { instance, binding })
    }

    /// Resolve the artifact types of one plan of one service.
    ///
    /// The service is re-fetched from the registry so the result reflects its
    /// current plans.
    pub async fn plan_types(&self, service_id: &str, plan_id: &str) -> Result<Types> {
        let service = self.registry.service(service_id).await?;

        let plan = service
            .plans
            .iter()
            .find(|p| p.id == plan_id)
            .ok_or_else(|| RegistryError::PlanNotFound {
                service_id: service_id.to_string(),
                plan_id: plan_id.to_string(),
            })?;

        let types = resolve_types(plan)?;
        debug!(service_id, plan_id, instance = %types.instance, "resolved plan types");
        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticRegistry;
    use osb_core::{Service, ServicePlan};
    use serde_json::json;

    fn resolver(services: Vec<Service>) -> CatalogResolver {
        let blobs = BlobClient::with_base_url("http://127.0.0.1:9/").expect("blob client");
        CatalogResolver::new(Arc::new(StaticRegistry::new(services)), blobs)
    }

    fn service() -> Service {
        Service {
            id: "svc".to_string(),
            name: "mysql".to_string(),
            plans: vec![ServicePlan {
                id: "small".to_string(),
                metadata: Some(json!({"instanceType": "gs://charts/mysql"})),
                ..ServicePlan::default()
            }],
            ..Service::default()
        }
    }

    #[tokio::test]
    async fn test_plan_types() {
        let types = resolver(vec![service()])
            .plan_types("svc", "small")
            .await
            .expect("resolve plan types");
        assert_eq!(types.instance, "gs://charts/mysql");
    }

    #[tokio::test]
    async fn test_plan_types_unknown_plan() {
        let err = resolver(vec![service()])
            .plan_types("svc", "huge")
            .await
            .expect_err("unknown plan");
        assert!(matches!(err, RegistryError::PlanNotFound { plan_id, .. } if plan_id == "huge"));
    }

    #[tokio::test]
    async fn test_plan_types_unknown_service() {
        let err = resolver(vec![service()])
            .plan_types("nope", "small")
            .await
            .expect_err("unknown service");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_catalog_fails_before_io_on_unusable_plan() {
        let mut broken = service();
        broken.plans[0].metadata = Some(json!({"bindingType": "gs://charts/user"}));

        let err = resolver(vec![broken]).catalog().await.expect_err("no types");
        assert!(matches!(err, RegistryError::NoUsableTypes { .. }));
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let catalog = resolver(Vec::new()).catalog().await.expect("empty catalog");
        assert!(catalog.services.is_empty());
    }
}

//! tfplugin6 Provider gRPC service
//!
//! Decodes protocol values, hands them to [`GoliatProvider`] and turns every
//! failure into diagnostics on the response.

use log::{debug, info};
use std::collections::HashMap;
use std::sync::Arc;
use tonic::{Request, Response, Status};

use crate::error::Result;
use crate::plugin::codec::{decode_dynamic, decode_raw_state, encode_dynamic};
use crate::plugin::diagnostics::{
    diagnostics_of, error_diagnostic, path_to_attribute, unsupported_data_source,
};
use crate::plugin::proto::tfplugin6 as tf;
use crate::plugin::proto::tfplugin6::provider_server::Provider;
use crate::provider::{GoliatProvider, ResourceType, Schema};

/// gRPC front of the provider
pub struct PluginService {
    provider: Arc<GoliatProvider>,
}

impl PluginService {
    pub fn new(provider: GoliatProvider) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

fn resource_schema(type_name: &str) -> Result<Schema> {
    ResourceType::from_name(type_name).map(GoliatProvider::resource_schema)
}

fn string_kind() -> i32 {
    tf::StringKind::Markdown as i32
}

/// Protocol schema for a provider or resource schema
pub fn to_proto_schema(schema: &Schema) -> tf::Schema {
    let attributes = schema
        .attributes
        .iter()
        .map(|attr| tf::schema::Attribute {
            name: attr.name.to_string(),
            r#type: br#""string""#.to_vec(),
            nested_type: None,
            description: attr.description.to_string(),
            required: attr.required,
            optional: attr.optional,
            computed: attr.computed,
            sensitive: attr.sensitive,
            description_kind: string_kind(),
            deprecated: false,
            write_only: false,
        })
        .collect();

    tf::Schema {
        version: schema.version,
        block: Some(tf::schema::Block {
            version: schema.version,
            attributes,
            block_types: Vec::new(),
            description: schema.description.to_string(),
            description_kind: string_kind(),
            deprecated: false,
        }),
    }
}

fn server_capabilities() -> tf::ServerCapabilities {
    tf::ServerCapabilities {
        plan_destroy: true,
        get_provider_schema_optional: false,
        move_resource_state: false,
    }
}

#[tonic::async_trait]
impl Provider for PluginService {
    async fn get_metadata(
        &self,
        _request: Request<tf::get_metadata::Request>,
    ) -> std::result::Result<Response<tf::get_metadata::Response>, Status> {
        debug!("GetMetadata");
        let resources = ResourceType::ALL
            .iter()
            .map(|ty| tf::get_metadata::ResourceMetadata {
                type_name: ty.name().to_string(),
            })
            .collect();

        Ok(Response::new(tf::get_metadata::Response {
            server_capabilities: Some(server_capabilities()),
            diagnostics: Vec::new(),
            data_sources: Vec::new(),
            resources,
        }))
    }

    async fn get_provider_schema(
        &self,
        _request: Request<tf::get_provider_schema::Request>,
    ) -> std::result::Result<Response<tf::get_provider_schema::Response>, Status> {
        debug!("GetProviderSchema");
        let resource_schemas: HashMap<String, tf::Schema> = GoliatProvider::resource_schemas()
            .into_iter()
            .map(|(name, schema)| (name.to_string(), to_proto_schema(&schema)))
            .collect();

        Ok(Response::new(tf::get_provider_schema::Response {
            provider: Some(to_proto_schema(&GoliatProvider::provider_schema())),
            resource_schemas,
            data_source_schemas: HashMap::new(),
            diagnostics: Vec::new(),
            provider_meta: None,
            server_capabilities: Some(server_capabilities()),
        }))
    }

    async fn validate_provider_config(
        &self,
        request: Request<tf::validate_provider_config::Request>,
    ) -> std::result::Result<Response<tf::validate_provider_config::Response>, Status> {
        debug!("ValidateProviderConfig");
        let request = request.into_inner();

        let diagnostics = match decode_dynamic(request.config.as_ref()) {
            Ok(Some(config)) => self
                .provider
                .validate_config(&config)
                .iter()
                .map(error_diagnostic)
                .collect(),
            Ok(None) => Vec::new(),
            Err(e) => vec![error_diagnostic(&e)],
        };

        Ok(Response::new(tf::validate_provider_config::Response {
            diagnostics,
        }))
    }

    async fn validate_resource_config(
        &self,
        request: Request<tf::validate_resource_config::Request>,
    ) -> std::result::Result<Response<tf::validate_resource_config::Response>, Status> {
        let request = request.into_inner();
        debug!("ValidateResourceConfig for {}", request.type_name);

        let result = decode_dynamic(request.config.as_ref()).and_then(|config| {
            let config = config.unwrap_or_default();
            self.provider.validate_resource(&request.type_name, &config)
        });

        Ok(Response::new(tf::validate_resource_config::Response {
            diagnostics: diagnostics_of(&result),
        }))
    }

    async fn validate_data_resource_config(
        &self,
        request: Request<tf::validate_data_resource_config::Request>,
    ) -> std::result::Result<Response<tf::validate_data_resource_config::Response>, Status> {
        let request = request.into_inner();
        Ok(Response::new(tf::validate_data_resource_config::Response {
            diagnostics: vec![unsupported_data_source(&request.type_name)],
        }))
    }

    async fn upgrade_resource_state(
        &self,
        request: Request<tf::upgrade_resource_state::Request>,
    ) -> std::result::Result<Response<tf::upgrade_resource_state::Response>, Status> {
        let request = request.into_inner();
        debug!(
            "UpgradeResourceState for {} from version {}",
            request.type_name, request.version
        );

        let result = (|| {
            let schema = resource_schema(&request.type_name)?;
            let upgraded = match decode_raw_state(request.raw_state.as_ref())? {
                Some(stored) => Some(self.provider.upgrade_state(&request.type_name, &stored)?),
                None => None,
            };
            encode_dynamic(upgraded.as_ref(), &schema)
        })();

        let diagnostics = diagnostics_of(&result);
        Ok(Response::new(tf::upgrade_resource_state::Response {
            upgraded_state: result.ok(),
            diagnostics,
        }))
    }

    async fn configure_provider(
        &self,
        request: Request<tf::configure_provider::Request>,
    ) -> std::result::Result<Response<tf::configure_provider::Response>, Status> {
        let request = request.into_inner();
        info!(
            "Configuring provider (Terraform {})",
            request.terraform_version
        );

        let result = decode_dynamic(request.config.as_ref()).and_then(|config| {
            let config = config.unwrap_or_default();
            self.provider.configure(&config)
        });

        Ok(Response::new(tf::configure_provider::Response {
            diagnostics: diagnostics_of(&result),
        }))
    }

    async fn read_resource(
        &self,
        request: Request<tf::read_resource::Request>,
    ) -> std::result::Result<Response<tf::read_resource::Response>, Status> {
        let request = request.into_inner();
        debug!("ReadResource for {}", request.type_name);

        let result = async {
            let schema = resource_schema(&request.type_name)?;
            let current = decode_dynamic(request.current_state.as_ref())?;
            let new_state = self.provider.read(&request.type_name, current).await?;
            encode_dynamic(new_state.as_ref(), &schema)
        }
        .await;

        let diagnostics = diagnostics_of(&result);
        Ok(Response::new(tf::read_resource::Response {
            new_state: result.ok(),
            diagnostics,
            private: request.private,
        }))
    }

    async fn plan_resource_change(
        &self,
        request: Request<tf::plan_resource_change::Request>,
    ) -> std::result::Result<Response<tf::plan_resource_change::Response>, Status> {
        let request = request.into_inner();
        debug!("PlanResourceChange for {}", request.type_name);

        let result = (|| -> Result<(tf::DynamicValue, Vec<String>)> {
            let schema = resource_schema(&request.type_name)?;
            let prior = decode_dynamic(request.prior_state.as_ref())?;
            let proposed = decode_dynamic(request.proposed_new_state.as_ref())?;
            let change = self
                .provider
                .plan(&request.type_name, prior.as_ref(), proposed)?;
            let planned = encode_dynamic(change.planned_state.as_ref(), &schema)?;
            Ok((planned, change.requires_replace))
        })();

        let response = match result {
            Ok((planned, requires_replace)) => tf::plan_resource_change::Response {
                planned_state: Some(planned),
                requires_replace: requires_replace
                    .iter()
                    .map(|name| path_to_attribute(name))
                    .collect(),
                planned_private: request.prior_private,
                diagnostics: Vec::new(),
                legacy_type_system: false,
            },
            Err(e) => tf::plan_resource_change::Response {
                diagnostics: vec![error_diagnostic(&e)],
                ..Default::default()
            },
        };

        Ok(Response::new(response))
    }

    async fn apply_resource_change(
        &self,
        request: Request<tf::apply_resource_change::Request>,
    ) -> std::result::Result<Response<tf::apply_resource_change::Response>, Status> {
        let request = request.into_inner();
        debug!("ApplyResourceChange for {}", request.type_name);

        let result = async {
            let schema = resource_schema(&request.type_name)?;
            let prior = decode_dynamic(request.prior_state.as_ref())?;
            let planned = decode_dynamic(request.planned_state.as_ref())?;
            let new_state = self
                .provider
                .apply(&request.type_name, prior, planned)
                .await?;
            encode_dynamic(new_state.as_ref(), &schema)
        }
        .await;

        let diagnostics = diagnostics_of(&result);
        Ok(Response::new(tf::apply_resource_change::Response {
            new_state: result.ok(),
            private: request.planned_private,
            diagnostics,
            legacy_type_system: false,
        }))
    }

    async fn import_resource_state(
        &self,
        request: Request<tf::import_resource_state::Request>,
    ) -> std::result::Result<Response<tf::import_resource_state::Response>, Status> {
        let request = request.into_inner();
        info!("Importing {} with id '{}'", request.type_name, request.id);

        let result = (|| {
            let schema = resource_schema(&request.type_name)?;
            let state = self.provider.import(&request.type_name, &request.id)?;
            encode_dynamic(Some(&state), &schema)
        })();

        let response = match result {
            Ok(state) => tf::import_resource_state::Response {
                imported_resources: vec![tf::import_resource_state::ImportedResource {
                    type_name: request.type_name,
                    state: Some(state),
                    private: Vec::new(),
                }],
                diagnostics: Vec::new(),
            },
            Err(e) => tf::import_resource_state::Response {
                imported_resources: Vec::new(),
                diagnostics: vec![error_diagnostic(&e)],
            },
        };

        Ok(Response::new(response))
    }

    async fn read_data_source(
        &self,
        request: Request<tf::read_data_source::Request>,
    ) -> std::result::Result<Response<tf::read_data_source::Response>, Status> {
        let request = request.into_inner();
        Ok(Response::new(tf::read_data_source::Response {
            state: None,
            diagnostics: vec![unsupported_data_source(&request.type_name)],
        }))
    }

    async fn stop_provider(
        &self,
        _request: Request<tf::stop_provider::Request>,
    ) -> std::result::Result<Response<tf::stop_provider::Response>, Status> {
        // Requests run to completion; there is nothing in flight to cancel
        info!("StopProvider received");
        Ok(Response::new(tf::stop_provider::Response {
            error: String::new(),
        }))
    }
}

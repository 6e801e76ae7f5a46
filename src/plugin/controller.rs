//! go-plugin GRPCController service

use log::info;
use std::sync::Arc;
use tokio::sync::Notify;
use tonic::{Request, Response, Status};

use crate::plugin::proto::plugin::grpc_controller_server::GrpcController;
use crate::plugin::proto::plugin::Empty;

/// go-plugin controller; Terraform asks it to stop the plugin
#[derive(Debug, Clone)]
pub struct Controller {
    shutdown: Arc<Notify>,
}

impl Controller {
    pub fn new(shutdown: Arc<Notify>) -> Self {
        Self { shutdown }
    }
}

#[tonic::async_trait]
impl GrpcController for Controller {
    async fn shutdown(&self, _request: Request<Empty>) -> Result<Response<Empty>, Status> {
        info!("Shutdown requested by Terraform");
        // stores a permit when the server is not waiting yet
        self.shutdown.notify_one();
        Ok(Response::new(Empty {}))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_shutdown_notifies_server() {
        let notify = Arc::new(Notify::new());
        let controller = Controller::new(notify.clone());

        controller.shutdown(Request::new(Empty {})).await.unwrap();

        tokio::time::timeout(Duration::from_secs(1), notify.notified())
            .await
            .expect("shutdown was not signalled");
    }
}

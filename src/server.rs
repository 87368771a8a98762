use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use warp::Filter;
use warp::http::StatusCode;

use crate::core::connector::{SessionApproval, WalletConnectConnector};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusResponse {
   pub status: bool,
   /// True while a pairing waits for a wallet
   pub pending: bool,
}

/// Handler for POST /session/{topic}
async fn session_handler(
   topic: String,
   connector: Arc<WalletConnectConnector>,
   approval: SessionApproval,
) -> Result<impl warp::Reply, Infallible> {
   info!(
      "session answer for topic {}: {}",
      topic, approval.status
   );

   if connector.respond(&topic, approval) {
      Ok(warp::reply::with_status(
         warp::reply::json(&StatusResponse {
            status: true,
            pending: false,
         }),
         StatusCode::OK,
      ))
   } else {
      warn!("session answer for unknown topic {}", topic);
      Ok(warp::reply::with_status(
         warp::reply::json(&StatusResponse {
            status: false,
            pending: connector.has_pending(),
         }),
         StatusCode::NOT_FOUND,
      ))
   }
}

/// Handler for GET /status
async fn status_handler(
   connector: Arc<WalletConnectConnector>,
) -> Result<impl warp::Reply, Infallible> {
   Ok(warp::reply::json(&StatusResponse {
      status: true,
      pending: connector.has_pending(),
   }))
}

fn with_connector(
   connector: Arc<WalletConnectConnector>,
) -> impl Filter<Extract = (Arc<WalletConnectConnector>,), Error = Infallible> + Clone {
   warp::any().map(move || connector.clone())
}

pub fn routes(
   connector: Arc<WalletConnectConnector>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
   let cors = warp::cors()
      .allow_any_origin()
      .allow_methods(vec!["GET", "POST", "OPTIONS"])
      .allow_headers(vec!["Content-Type", "Accept"]);

   let status_route = warp::path!("status")
      .and(warp::get())
      .and(with_connector(connector.clone()))
      .and_then(status_handler);

   let session_route = warp::path!("session" / String)
      .and(warp::post())
      .and(with_connector(connector))
      .and(warp::body::json::<SessionApproval>())
      .and_then(session_handler);

   status_route
      .or(session_route)
      .with(cors)
      .with(warp::trace::request())
}

/// Serve the WalletConnect relay endpoint on localhost
///
/// Only returns early if the port cannot be bound.
pub async fn run_server(
   connector: Arc<WalletConnectConnector>,
   port: u16,
) -> Result<(), std::io::Error> {
   let addr = SocketAddr::from(([127, 0, 0, 1], port));
   let listener = match TcpListener::bind(addr).await {
      Ok(listener) => listener,
      Err(e) => {
         error!("WalletConnect relay failed to bind {}: {}", addr, e);
         return Err(e);
      }
   };
   info!("WalletConnect relay listening on {}", addr);

   warp::serve(routes(connector)).incoming(listener).run().await;
   Ok(())
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::core::connector::{Connector, ConnectorError};
   use std::time::Duration;
   use warp::Reply;

   const ACCOUNT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

   fn connector() -> Arc<WalletConnectConnector> {
      Arc::new(WalletConnectConnector::new("test-id", "http://127.0.0.1:65533"))
   }

   async fn offered_topic(connector: &WalletConnectConnector) -> String {
      let mut rx = connector.subscribe_pairing();
      let pairing = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|p| p.is_some()))
         .await
         .expect("pairing was never offered")
         .unwrap()
         .clone();
      pairing.unwrap().topic
   }

   #[tokio::test]
   async fn approval_over_relay() {
      let connector = connector();
      let task = {
         let connector = connector.clone();
         tokio::spawn(async move { connector.activate().await })
      };
      let topic = offered_topic(&connector).await;

      let status = status_handler(connector.clone()).await.unwrap().into_response();
      assert_eq!(status.status(), StatusCode::OK);

      let approval: SessionApproval = serde_json::from_value(serde_json::json!({
         "status": "approved",
         "accounts": [ACCOUNT],
         "chainId": "0x1"
      }))
      .unwrap();
      let reply = session_handler(topic, connector.clone(), approval)
         .await
         .unwrap()
         .into_response();
      assert_eq!(reply.status(), StatusCode::OK);

      let activation = task.await.unwrap().unwrap();
      assert_eq!(activation.account, ACCOUNT);
      assert_eq!(activation.chain_id, 1);
   }

   #[tokio::test]
   async fn port_in_use_is_an_error() {
      let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
      let port = taken.local_addr().unwrap().port();

      let result = tokio::time::timeout(Duration::from_secs(5), run_server(connector(), port))
         .await
         .expect("relay kept running on a taken port");
      assert!(result.is_err());
   }

   #[tokio::test]
   async fn unknown_topic_is_not_found() {
      let connector = connector();
      let reply = session_handler("nope".to_string(), connector, SessionApproval::rejected())
         .await
         .unwrap()
         .into_response();
      assert_eq!(reply.status(), StatusCode::NOT_FOUND);
   }

   #[tokio::test]
   async fn rejection_over_relay() {
      let connector = connector();
      let task = {
         let connector = connector.clone();
         tokio::spawn(async move { connector.activate().await })
      };
      let topic = offered_topic(&connector).await;

      let reply = session_handler(topic, connector.clone(), SessionApproval::rejected())
         .await
         .unwrap()
         .into_response();
      assert_eq!(reply.status(), StatusCode::OK);
      assert!(matches!(
         task.await.unwrap(),
         Err(ConnectorError::UserRejected)
      ));
   }
}

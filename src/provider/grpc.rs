use std::str::FromStr;

use anyhow::Context;
use cosmos_sdk_proto::cosmos::base::tendermint::v1beta1::GetBlockByHeightRequest;
use cosmrs::proto::cosmos::base::tendermint::v1beta1::service_client::ServiceClient as TendermintServiceClient;
use sha256::digest;
use tonic::codegen::http::Uri;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::{configuration::Config, error::Error};

#[derive(Debug)]
pub struct Grpc {
    pub config: Config,
    pub tendermint_client: TendermintServiceClient<Channel>,
}

impl Grpc {
    pub async fn new(config: Config) -> Result<Grpc, Error> {
        let host = config.grpc_host.to_owned();
        let uri = Uri::from_str(&host).context("Invalid grpc url")?;
        let limit = 10 * 1024 * 1024;

        let mut endpoint = Endpoint::from(uri.clone())
            .keep_alive_while_idle(true)
            .timeout(std::time::Duration::from_secs(config.timeout));

        if uri.scheme_str() == Some("https") {
            let tls_config = ClientTlsConfig::new().with_native_roots();
            endpoint = endpoint
                .tls_config(tls_config)
                .context("Could not parse tls config")?;
        }

        let channel = endpoint.connect().await.with_context(|| {
            format!(r#"Failed to parse gRPC URI, "{uri}"!"#)
        })?;

        let tendermint_client =
            TendermintServiceClient::with_origin(channel, uri)
                .accept_compressed(tonic::codec::CompressionEncoding::Gzip)
                .max_decoding_message_size(limit);

        Ok(Grpc {
            config,
            tendermint_client,
        })
    }

    /// Hex sha256 of every raw transaction included at `height`, in block
    /// order.
    pub async fn get_block_tx_hashes(
        &self,
        height: i64,
    ) -> Result<Vec<String>, Error> {
        const QUERY_NODE_INFO_ERROR: &str = "Failed to query node's block!";

        const MISSING_BLOCK_INFO_ERROR: &str =
            "Query response doesn't contain block information!";

        const MISSING_BLOCK_DATA_INFO_ERROR: &str =
            "Query response doesn't contain block's data information!";

        let mut client = self.tendermint_client.clone();
        let block = client
            .get_block_by_height(GetBlockByHeightRequest { height })
            .await
            .context(QUERY_NODE_INFO_ERROR)
            .and_then(|response| {
                response
                    .into_inner()
                    .sdk_block
                    .context(MISSING_BLOCK_INFO_ERROR)
            })?;

        let txs = block.data.context(MISSING_BLOCK_DATA_INFO_ERROR)?.txs;

        Ok(txs.iter().map(|tx| digest(tx)).collect())
    }
}

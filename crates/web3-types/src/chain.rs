use anyhow::bail;
use serde::{Deserialize, Serialize};

pub const MAINNET: u64 = 1;
pub const ROPSTEN: u64 = 3;
pub const RINKEBY: u64 = 4;
pub const GOERLI: u64 = 5;
pub const KOVAN: u64 = 42;

pub const SUPPORTED_CHAINS: [u64; 5] = [MAINNET, ROPSTEN, RINKEBY, GOERLI, KOVAN];

const ERR_MSG: &str =
   "Supported chains are: Mainnet(1), Ropsten(3), Rinkeby(4), Goerli(5), Kovan(42)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
   Mainnet(u64),
   Ropsten(u64),
   Rinkeby(u64),
   Goerli(u64),
   Kovan(u64),
}

impl Default for ChainId {
   fn default() -> Self {
      ChainId::Mainnet(MAINNET)
   }
}

impl TryFrom<u64> for ChainId {
   type Error = anyhow::Error;

   fn try_from(id: u64) -> Result<Self, Self::Error> {
      ChainId::new(id)
   }
}

impl ChainId {
   pub fn new(id: u64) -> Result<Self, anyhow::Error> {
      let chain = match id {
         MAINNET => ChainId::Mainnet(id),
         ROPSTEN => ChainId::Ropsten(id),
         RINKEBY => ChainId::Rinkeby(id),
         GOERLI => ChainId::Goerli(id),
         KOVAN => ChainId::Kovan(id),
         _ => bail!("Unsupported chain id: {}\n{}", id, ERR_MSG),
      };
      Ok(chain)
   }

   /// Return all supported chains
   pub fn supported_chains() -> Vec<ChainId> {
      SUPPORTED_CHAINS
         .iter()
         .filter_map(|id| ChainId::new(*id).ok())
         .collect()
   }

   pub fn id(&self) -> u64 {
      match self {
         ChainId::Mainnet(id) => *id,
         ChainId::Ropsten(id) => *id,
         ChainId::Rinkeby(id) => *id,
         ChainId::Goerli(id) => *id,
         ChainId::Kovan(id) => *id,
      }
   }

   pub fn id_as_hex(&self) -> String {
      format!("0x{:x}", self.id())
   }

   /// Display name of the network
   pub fn name(&self) -> &'static str {
      match self {
         ChainId::Mainnet(_) => "Mainnet",
         ChainId::Ropsten(_) => "Ropsten",
         ChainId::Rinkeby(_) => "Rinkeby",
         ChainId::Goerli(_) => "Goerli",
         ChainId::Kovan(_) => "Kovan",
      }
   }

   /// Subdomain Infura serves this network under
   pub fn infura_network(&self) -> &'static str {
      match self {
         ChainId::Mainnet(_) => "mainnet",
         ChainId::Ropsten(_) => "ropsten",
         ChainId::Rinkeby(_) => "rinkeby",
         ChainId::Goerli(_) => "goerli",
         ChainId::Kovan(_) => "kovan",
      }
   }

   pub fn infura_rpc_url(&self, project_id: &str) -> String {
      format!(
         "https://{}.infura.io/v3/{}",
         self.infura_network(),
         project_id
      )
   }
}

/// Human readable network label for any chain id
pub fn network_name(chain_id: u64) -> String {
   match ChainId::new(chain_id) {
      Ok(chain) => chain.name().to_string(),
      Err(_) => format!("unknown network {}", chain_id),
   }
}

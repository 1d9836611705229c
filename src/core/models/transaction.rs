use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::address::ObjectId;

/// BCS-encodable pure input. Addresses are carried in their `0x`-prefixed
/// normalized form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PureValue {
    U64(u64),
    Address(String),
    VectorU8(Vec<u8>),
    VectorAddress(Vec<String>),
    VectorU64(Vec<u64>),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CallArg {
    Pure { value: PureValue },
    Object { object_id: String },
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult { result: u16, index: u16 },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct MoveCall {
    pub package: String,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Argument>,
}

impl MoveCall {
    pub fn target(&self) -> String {
        format!("{}::{}::{}", self.package, self.module, self.function)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum Command {
    MoveCall(MoveCall),
    MergeCoins {
        destination: Argument,
        sources: Vec<Argument>,
    },
    TransferObjects {
        objects: Vec<Argument>,
        address: Argument,
    },
}

/// Ordered inputs and commands of a Sui programmable transaction block.
/// Signing, gas selection and BCS encoding are left to the wallet.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl ProgrammableTransaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pure(&mut self, value: PureValue) -> Argument {
        self.push_input(CallArg::Pure { value })
    }

    /// Object inputs are deduplicated; referencing the same object twice
    /// yields the same argument.
    pub fn object(&mut self, object_id: &ObjectId) -> Argument {
        let id = object_id.to_string();
        let position = self
            .inputs
            .iter()
            .position(|input| matches!(input, CallArg::Object { object_id: known } if *known == id));
        match position {
            Some(index) => Argument::Input(index as u16),
            None => self.push_input(CallArg::Object { object_id: id }),
        }
    }

    pub fn move_call(&mut self, package: &str, module: &str, function: &str, arguments: Vec<Argument>) -> Argument {
        self.push_command(Command::MoveCall(MoveCall {
            package: package.to_string(),
            module: module.to_string(),
            function: function.to_string(),
            type_arguments: Vec::new(),
            arguments,
        }))
    }

    pub fn merge_coins(&mut self, destination: Argument, sources: Vec<Argument>) {
        self.push_command(Command::MergeCoins { destination, sources });
    }

    pub fn transfer_objects(&mut self, objects: Vec<Argument>, address: Argument) {
        self.push_command(Command::TransferObjects { objects, address });
    }

    pub fn move_calls(&self) -> impl Iterator<Item = &MoveCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::MoveCall(call) => Some(call),
            _ => None,
        })
    }

    fn push_input(&mut self, input: CallArg) -> Argument {
        self.inputs.push(input);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    fn push_command(&mut self, command: Command) -> Argument {
        self.commands.push(command);
        Argument::Result((self.commands.len() - 1) as u16)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct TransactionReceipt {
    pub digest: String,
    #[serde(default)]
    pub status: Option<String>,
}

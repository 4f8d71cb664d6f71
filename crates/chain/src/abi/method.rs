use super::{AbiError, AbiType, AbiValue, TransactionRef};
use crate::hash::sha512_256;

/// Application call argument slots, selector included.
pub const MAX_APP_ARGS: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiArg {
    pub name: String,
    pub ty: AbiType,
}

impl AbiArg {
    pub fn new(name: impl Into<String>, ty: AbiType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A contract method: name, ordered arguments and optional return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiMethod {
    pub name: String,
    pub args: Vec<AbiArg>,
    /// `None` means `void`.
    pub returns: Option<AbiType>,
}

/// An encoded call, ready to be placed in an application call transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub selector: [u8; 4],
    pub args: Vec<Vec<u8>>,
}

impl MethodCall {
    /// Selector followed by the encoded value arguments.
    pub fn app_args(&self) -> Vec<Vec<u8>> {
        let mut out = Vec::with_capacity(self.args.len() + 1);
        out.push(self.selector.to_vec());
        out.extend(self.args.iter().cloned());
        out
    }
}

impl AbiMethod {
    pub fn from_parts(name: impl Into<String>, args: Vec<AbiArg>, returns: Option<AbiType>) -> Self {
        Self {
            name: name.into(),
            args,
            returns,
        }
    }

    /// Builds a method from type names, e.g.
    /// `AbiMethod::parse("create_goal", &[("owner", "address")], "void")`.
    pub fn parse(name: &str, args: &[(&str, &str)], returns: &str) -> Result<Self, AbiError> {
        let args = args
            .iter()
            .map(|(arg_name, ty)| Ok(AbiArg::new(*arg_name, AbiType::parse(ty)?)))
            .collect::<Result<Vec<_>, AbiError>>()?;
        let returns = match returns.trim() {
            "void" => None,
            other => {
                let ty = AbiType::parse(other)?;
                if ty.is_transaction_ref() {
                    return Err(AbiError::UnsupportedType(other.to_string()));
                }
                Some(ty)
            }
        };
        Ok(Self::from_parts(name, args, returns))
    }

    /// Canonical signature, `name(type,type)ret`.
    pub fn signature(&self) -> String {
        let args: Vec<String> = self.args.iter().map(|a| a.ty.to_string()).collect();
        let returns = self
            .returns
            .map(|t| t.to_string())
            .unwrap_or_else(|| "void".to_string());
        format!("{}({}){}", self.name, args.join(","), returns)
    }

    pub fn selector(&self) -> [u8; 4] {
        let digest = sha512_256(&[self.signature().as_bytes()]);
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&digest[..4]);
        selector
    }

    /// Transaction references this method expects in front of it, in order.
    pub fn transaction_refs(&self) -> Vec<TransactionRef> {
        self.args
            .iter()
            .filter_map(|a| match a.ty {
                AbiType::Transaction(tx) => Some(tx),
                _ => None,
            })
            .collect()
    }

    /// Encodes the value arguments. `values` holds one entry per non-transaction
    /// argument, in declaration order.
    pub fn encode_call(&self, values: &[AbiValue]) -> Result<MethodCall, AbiError> {
        let value_args: Vec<&AbiArg> = self
            .args
            .iter()
            .filter(|a| !a.ty.is_transaction_ref())
            .collect();

        if value_args.len() != values.len() {
            return Err(AbiError::ArgumentCount {
                method: self.signature(),
                expected: value_args.len(),
                actual: values.len(),
            });
        }
        if value_args.len() + 1 > MAX_APP_ARGS {
            return Err(AbiError::TooManyArguments {
                method: self.signature(),
                count: value_args.len(),
                limit: MAX_APP_ARGS - 1,
            });
        }

        let args = value_args
            .iter()
            .zip(values)
            .map(|(arg, value)| arg.ty.encode(value))
            .collect::<Result<Vec<_>, AbiError>>()?;

        Ok(MethodCall {
            selector: self.selector(),
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_reference_selector() {
        let method = AbiMethod::parse("add", &[("a", "uint64"), ("b", "uint64")], "uint128").unwrap();
        assert_eq!(method.signature(), "add(uint64,uint64)uint128");
        assert_eq!(hex(&method.selector()), "8aa3b61f");
    }

    #[test]
    fn test_vault_selectors() {
        let create = AbiMethod::parse(
            "create_goal",
            &[("owner", "address"), ("target", "uint64"), ("deadline", "uint64")],
            "void",
        )
        .unwrap();
        assert_eq!(create.signature(), "create_goal(address,uint64,uint64)void");
        assert_eq!(hex(&create.selector()), "e4a8c700");

        let deposit = AbiMethod::parse("deposit", &[("payment", "pay")], "void").unwrap();
        assert_eq!(hex(&deposit.selector()), "3625e4eb");

        let withdraw = AbiMethod::parse("withdraw", &[], "void").unwrap();
        assert_eq!(withdraw.signature(), "withdraw()void");
        assert_eq!(hex(&withdraw.selector()), "b7355fd1");
    }

    #[test]
    fn test_encode_call_orders_args_after_selector() {
        let method = AbiMethod::parse(
            "create_goal",
            &[("owner", "address"), ("target", "uint64"), ("deadline", "uint64")],
            "void",
        )
        .unwrap();
        let owner = Address::new([9u8; 32]);
        let call = method
            .encode_call(&[
                AbiValue::Address(owner),
                AbiValue::Uint(5_000_000),
                AbiValue::Uint(1_767_225_600),
            ])
            .unwrap();

        let app_args = call.app_args();
        assert_eq!(app_args.len(), 4);
        assert_eq!(app_args[0], method.selector().to_vec());
        assert_eq!(app_args[1], vec![9u8; 32]);
        assert_eq!(app_args[2], 5_000_000u64.to_be_bytes().to_vec());
        assert_eq!(app_args[3], 1_767_225_600u64.to_be_bytes().to_vec());
    }

    #[test]
    fn test_transaction_refs_are_not_encoded() {
        let method = AbiMethod::parse("deposit", &[("payment", "pay")], "void").unwrap();
        assert_eq!(method.transaction_refs(), vec![TransactionRef::Payment]);
        let call = method.encode_call(&[]).unwrap();
        assert_eq!(call.app_args(), vec![method.selector().to_vec()]);
    }

    #[test]
    fn test_argument_count_mismatch() {
        let method = AbiMethod::parse("withdraw", &[], "void").unwrap();
        let err = method.encode_call(&[AbiValue::Uint(1)]).unwrap_err();
        assert_eq!(
            err,
            AbiError::ArgumentCount {
                method: "withdraw()void".to_string(),
                expected: 0,
                actual: 1
            }
        );
    }

    #[test]
    fn test_unsupported_return_type() {
        assert!(AbiMethod::parse("f", &[], "string").is_err());
        assert!(AbiMethod::parse("f", &[], "pay").is_err());
    }

    #[test]
    fn test_too_many_arguments() {
        let args: Vec<AbiArg> = (0..16)
            .map(|i| AbiArg::new(format!("a{}", i), AbiType::Uint(64)))
            .collect();
        let method = AbiMethod::from_parts("wide", args, None);
        let values = vec![AbiValue::Uint(0); 16];
        assert!(matches!(
            method.encode_call(&values),
            Err(AbiError::TooManyArguments { .. })
        ));
    }
}

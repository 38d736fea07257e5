//! Tagged enumerations for input and output spending styles.

/// The spending style of a transaction input, determined by the shape of
/// its scriptSig.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum InputKind {
    /// The zero value: no classification has been assigned yet.
    #[default]
    None,
    /// A pre-SegWit input with a nonempty scriptSig containing signatures
    /// and/or a redeem script.
    Legacy,
    /// A P2SH-wrapped SegWit input: an empty-looking legacy scriptSig
    /// pushing a witness program.
    Compatibility,
    /// A native SegWit input with an empty scriptSig.
    Witness,
}

/// The spending style of a transaction output, determined by the shape of
/// its scriptPubkey.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum OutputKind {
    /// The zero value: no classification has been assigned yet.
    #[default]
    None,
    /// Pay-to-witness-pubkey-hash.
    WPKH,
    /// Pay-to-witness-script-hash.
    WSH,
    /// An OP_RETURN data output.
    OpReturn,
    /// Pay-to-pubkey-hash.
    PKH,
    /// Pay-to-script-hash.
    SH,
    /// A scriptPubkey that does not match any standard template.
    Nonstandard,
}

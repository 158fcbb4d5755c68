use crate::*;
use proptest::prelude::*;

/// Number of symbols used by generated expressions
pub(crate) const ARB_SYMBOLS: usize = 4;

/// Symbol space naming the symbols of generated expressions
pub(crate) fn arb_space() -> Result<SymbolSpace, BoolsimError> {
    let mut space = SymbolSpace::new();
    for name in ["A", "B", "C", "D"].iter().take(ARB_SYMBOLS) {
        space.provide(name)?;
    }
    Ok(space)
}

/// Random expressions over a few symbols, with some constants and a bounded depth
pub(crate) fn arb_expr() -> BoxedStrategy<Expr> {
    let leaf = prop_oneof![
        1 => any::<bool>().prop_map(Expr::constant),
        4 => (0..ARB_SYMBOLS).prop_map(|uid| Expr::symbol(Symbol::from(uid))),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            1 => inner.clone().prop_map(|e| !e),
            3 => (prop::sample::select(Operator::ALL.to_vec()), inner.clone(), inner)
                .prop_map(|(op, lhs, rhs)| op.join(lhs, rhs)),
        ]
    })
    .boxed()
}

/// Operator binding strengths for the generated language.
/// Lower weight binds tighter. Weights are fractional so new levels can sit
/// between existing ones without renumbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    Atomic,         // 0    literals, identifiers
    New,            // 1.1  new
    Member,         // 1.2  . []
    FunctionCall,   // 2    ()
    Increment,      // 3    ++
    Decrement,      // 3    --
    BitwiseNot,     // 4.1  ~
    UnaryPlus,      // 4.2  +
    UnaryNegation,  // 4.3  -
    LogicalNot,     // 4.4  !
    Typeof,         // 4.5  typeof
    Void,           // 4.6  void
    Delete,         // 4.7  delete
    Await,          // 4.8  await
    Exponentiation, // 5.0  **
    Multiplication, // 5.1  *
    Division,       // 5.2  /
    Modulus,        // 5.3  %
    Subtraction,    // 6.1  -
    Addition,       // 6.2  +
    BitwiseShift,   // 7    << >> >>>
    Relational,     // 8    < <= > >=
    In,             // 8    in
    Instanceof,     // 8    instanceof
    Equality,       // 9    == != === !==
    BitwiseAnd,     // 10   &
    BitwiseXor,     // 11   ^
    BitwiseOr,      // 12   |
    LogicalAnd,     // 13   &&
    LogicalOr,      // 14   ||
    Conditional,    // 15   ?:
    Assignment,     // 16   = += -= *= /= ...
    Yield,          // 17   yield
    Comma,          // 18   ,
    None,           // 99   (...), no outer constraint
}

impl Order {
    pub fn weight(self) -> f64 {
        match self {
            Order::Atomic => 0.0,
            Order::New => 1.1,
            Order::Member => 1.2,
            Order::FunctionCall => 2.0,
            Order::Increment => 3.0,
            Order::Decrement => 3.0,
            Order::BitwiseNot => 4.1,
            Order::UnaryPlus => 4.2,
            Order::UnaryNegation => 4.3,
            Order::LogicalNot => 4.4,
            Order::Typeof => 4.5,
            Order::Void => 4.6,
            Order::Delete => 4.7,
            Order::Await => 4.8,
            Order::Exponentiation => 5.0,
            Order::Multiplication => 5.1,
            Order::Division => 5.2,
            Order::Modulus => 5.3,
            Order::Subtraction => 6.1,
            Order::Addition => 6.2,
            Order::BitwiseShift => 7.0,
            Order::Relational => 8.0,
            Order::In => 8.0,
            Order::Instanceof => 8.0,
            Order::Equality => 9.0,
            Order::BitwiseAnd => 10.0,
            Order::BitwiseXor => 11.0,
            Order::BitwiseOr => 12.0,
            Order::LogicalAnd => 13.0,
            Order::LogicalOr => 14.0,
            Order::Conditional => 15.0,
            Order::Assignment => 16.0,
            Order::Yield => 17.0,
            Order::Comma => 18.0,
            Order::None => 99.0,
        }
    }
}

/// Outer-inner pairings that do NOT require parentheses even though the
/// default rule would add them.
pub const ORDER_OVERRIDES: [(Order, Order); 9] = [
    // (foo()).bar -> foo().bar
    // (foo())[0] -> foo()[0]
    (Order::FunctionCall, Order::Member),
    // (foo())() -> foo()()
    (Order::FunctionCall, Order::FunctionCall),
    // (foo.bar).baz -> foo.bar.baz
    // (foo[0])[1] -> foo[0][1]
    (Order::Member, Order::Member),
    // (foo.bar)() -> foo.bar()
    (Order::Member, Order::FunctionCall),
    // !(!foo) -> !!foo
    (Order::LogicalNot, Order::LogicalNot),
    // a * (b * c) -> a * b * c
    (Order::Multiplication, Order::Multiplication),
    // a + (b + c) -> a + b + c
    (Order::Addition, Order::Addition),
    // a && (b && c) -> a && b && c
    (Order::LogicalAnd, Order::LogicalAnd),
    // a || (b || c) -> a || b || c
    (Order::LogicalOr, Order::LogicalOr),
];

/// Whether a child fragment of strength `inner` must be parenthesized when
/// spliced into a context demanding strength `outer`.
pub fn requires_parens(outer: Order, inner: Order) -> bool {
    let o = outer.weight();
    let i = inner.weight();
    if o > i {
        return false;
    }
    if o == i && (outer == Order::Atomic || outer == Order::None) {
        // Equal strengths at the extremes never nest ambiguously.
        return false;
    }
    !ORDER_OVERRIDES.contains(&(outer, inner))
}

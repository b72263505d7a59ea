//! Macro to share the message-appending surface between error types

/// Implements `append`, `with`, `message` and `fmt::Write` for a type that
/// stores its text in a `message: Message` field.
macro_rules! impl_message_builder {
    ($target:ty) => {
        impl $target {
            /// Append `op` to the message, returning `self` for chaining.
            pub fn append<'a>(
                &mut self,
                op: impl Into<$crate::error::format::Operand<'a>>,
            ) -> &mut Self {
                self.message.push(op);
                self
            }

            /// By-value form of [`append`](Self::append).
            pub fn with<'a>(mut self, op: impl Into<$crate::error::format::Operand<'a>>) -> Self {
                self.message.push(op);
                self
            }

            /// Text accumulated so far.
            pub fn message(&self) -> &str {
                self.message.as_str()
            }
        }

        impl ::std::fmt::Write for $target {
            fn write_str(&mut self, s: &str) -> ::std::fmt::Result {
                ::std::fmt::Write::write_str(&mut self.message, s)
            }
        }

        impl ::std::fmt::Display for $target {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.message.as_str())
            }
        }
    };
}

pub(crate) use impl_message_builder;

/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::FailResult;

use ::clap;
use ::std::str::FromStr;

/// Trait used to factor out code for adding arguments to a binary and parsing them,
/// leveraging type inference to help reduce boilerplate.
pub trait CliDeserialize: Sized {
    fn augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> (clap::App<'a, 'b>, ClapDeserializer<Self>)
    {
        let app = Self::_augment_clap_app(app);
        let token = ClapDeserializer(Default::default());
        (app, token)
    }

    /// Don't use this. Call 'augment_clap_app' instead.
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>;
    /// Don't use this. Call 'resolve_args' on the ClapDeserializer instead.
    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>;
}

/// Token of "proof" that a clap app was augmented to be capable of deserializing A.
pub struct ClapDeserializer<A>(::std::marker::PhantomData<A>);

impl<A> ClapDeserializer<A>
where A: CliDeserialize,
{
    /// Deserialize the arguments.  This does not perform any IO.
    pub fn resolve_args(self, matches: &clap::ArgMatches<'_>) -> FailResult<A>
    { A::_resolve_args(matches) }
}

// Tuple as product combinator
impl<A, B> CliDeserialize for (A, B)
where
    A: CliDeserialize,
    B: CliDeserialize,
{
    fn _augment_clap_app<'a, 'b>(app: clap::App<'a, 'b>) -> clap::App<'a, 'b>
    {
        let app = A::_augment_clap_app(app);
        let app = B::_augment_clap_app(app);
        app
    }

    fn _resolve_args(matches: &clap::ArgMatches<'_>) -> FailResult<Self>
    { Ok((A::_resolve_args(matches)?, B::_resolve_args(matches)?)) }
}

pub trait ArgMatchesExt {
    /// For when the value ought to exist because it was 'required(true)'
    /// (and therefore clap would have exited if it were missing)
    fn expect_value_of(&self, name: &str) -> String;

    /// Parse an optional value with `FromStr`, naming the argument on failure.
    fn parse_value_of<T>(&self, name: &str) -> FailResult<Option<T>>
    where
        T: FromStr,
        T::Err: ::std::fmt::Display;
}

impl<'a> ArgMatchesExt for clap::ArgMatches<'a> {
    fn expect_value_of(&self, name: &str) -> String
    { self.value_of(name).unwrap_or_else(|| panic!("BUG! ({} was required)", name)).into() }

    fn parse_value_of<T>(&self, name: &str) -> FailResult<Option<T>>
    where
        T: FromStr,
        T::Err: ::std::fmt::Display,
    {
        match self.value_of(name) {
            None => Ok(None),
            Some(s) => match s.parse() {
                Ok(value) => Ok(Some(value)),
                Err(e) => bail!("invalid value {:?} for --{}: {}", s, name.replace('_', "-"), e),
            },
        }
    }
}

/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::CheckFile;
use crate::Result;

use ::std::path::Path;
use ::trajsplit_trajectory_io::{Frame, Trajectory};

/// The frames of a trajectory file, without regard for where it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzFrames(pub Vec<Frame>);

// for "keyword arguments"
#[derive(Debug, Clone, Copy)]
pub struct XyzTolerances {
    /// Absolute tolerance on each cartesian coordinate.
    pub cart_abs_tol: f64,
}

impl Default for XyzTolerances {
    fn default() -> Self { XyzTolerances { cart_abs_tol: 1e-10 } }
}

impl CheckFile for XyzFrames {
    type OtherArgs = XyzTolerances;

    fn read_file(path: &Path) -> Result<Self>
    { Ok(XyzFrames(Trajectory::load(path)?.into_frames())) }

    fn check_against(&self, expected: &Self, tol: XyzTolerances)
    {
        assert_eq!(self.0.len(), expected.0.len(), "wrong number of frames");
        for (i, (actual, expected)) in self.0.iter().zip(&expected.0).enumerate() {
            assert_eq!(actual.title, expected.title, "frame {}: title", i);
            assert_eq!(actual.num_atoms(), expected.num_atoms(), "frame {}: atom count", i);

            for (j, (a, b)) in actual.atoms.iter().zip(&expected.atoms).enumerate() {
                assert_eq!(a.symbol, b.symbol, "frame {}, atom {}: symbol", i, j);
                assert_eq!(a.extra, b.extra, "frame {}, atom {}: extra columns", i, j);
                for k in 0..3 {
                    assert!(
                        (a.cart[k] - b.cart[k]).abs() <= tol.cart_abs_tol,
                        "frame {}, atom {}: {:?} != {:?}", i, j, a.cart, b.cart,
                    );
                }
            }
        }
    }
}

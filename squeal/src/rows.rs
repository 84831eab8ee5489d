///
/// Row Iteration
///
/// `RowIterator` walks a cursor forward one engine step per `next()` call.
/// It is single-pass and cannot be restarted:
/// - a row yields `Some(Ok(cursor))`, valid until the next call
/// - exhaustion yields `None`, and `None` forever after
/// - a step error yields `Some(Err(e))` once, then `None` forever after
///
/// Because each row borrows the cursor, `RowIterator` is a lending iterator
/// and does not implement `Iterator`. `MappedRows` maps every row through a
/// closure and is a regular `Iterator`; a step error or a closure error is
/// its last item.
///

use crate::cursor::StatementCursor;
use crate::engine::StatementHandle;
use crate::error::Result;

pub struct RowIterator<'c, H: StatementHandle> {
    cursor: &'c mut StatementCursor<H>,
    finished: bool,
}

impl<'c, H: StatementHandle> RowIterator<'c, H> {
    pub(crate) fn new(cursor: &'c mut StatementCursor<H>) -> Self {
        Self {
            cursor,
            finished: false,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Result<&StatementCursor<H>>> {
        if self.finished {
            return None;
        }
        match self.cursor.step() {
            Ok(true) => Some(Ok(&*self.cursor)),
            Ok(false) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn map<T, F>(self, f: F) -> MappedRows<'c, H, F>
    where
        F: FnMut(&StatementCursor<H>) -> Result<T>,
    {
        MappedRows { rows: self, f }
    }
}

pub struct MappedRows<'c, H: StatementHandle, F> {
    rows: RowIterator<'c, H>,
    f: F,
}

impl<H, F, T> Iterator for MappedRows<'_, H, F>
where
    H: StatementHandle,
    F: FnMut(&StatementCursor<H>) -> Result<T>,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let f = &mut self.f;
        let item = self.rows.next().map(|row| row.and_then(|cursor| f(cursor)));
        if matches!(item, Some(Err(_))) {
            self.rows.finished = true;
        }
        item
    }
}

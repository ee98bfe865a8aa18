//! Bounds-checked cursor over an immutable byte buffer.
//!
//! A [`ByteCursor`] borrows its buffer and is `Copy`, so any number of cursors can
//! walk the same storage. Sub views share the backing slice instead of copying it.
//!
//! ```
//! use std::io::SeekFrom;
//! use acs_types::file::ByteCursor;
//!
//! let data = [0x34, 0x12, 0xAA, 0xBB, 0xCC];
//! let mut cursor = ByteCursor::new(&data);
//!
//! assert_eq!(cursor.read_u16().unwrap(), 0x1234);
//! let mut tail = cursor.sub_view(2).unwrap();
//! assert_eq!(tail.read_u8().unwrap(), 0xAA);
//! assert_eq!(cursor.position(), 4);
//!
//! cursor.seek(SeekFrom::End(-1)).unwrap();
//! assert_eq!(cursor.read_u8().unwrap(), 0xCC);
//! ```

use std::io::SeekFrom;

use crate::file::OutOfBounds;

/// Sequential and random-access reader over a borrowed byte slice.
///
/// All integers are little-endian. A failed read leaves the position unchanged,
/// but callers are expected to abort on the first error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteCursor<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> ByteCursor<'a> {
	/// Creates a cursor positioned at the start of `data`.
	pub fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			pos: 0,
		}
	}

	/// Returns the length of the view.
	#[inline]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` if the view is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Returns the current read position relative to the start of the view.
	#[inline]
	pub fn position(&self) -> usize {
		self.pos
	}

	/// Returns the number of unread bytes.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	/// Returns the whole underlying view.
	#[inline]
	pub fn as_slice(&self) -> &'a [u8] {
		self.data
	}

	/// Borrows the next `n` bytes and advances past them.
	pub fn read_slice(&mut self, n: usize) -> Result<&'a [u8], OutOfBounds> {
		let end = self.pos.checked_add(n).filter(|&end| end <= self.data.len()).ok_or(
			OutOfBounds::Read {
				offset: self.pos,
				requested: n,
				len: self.data.len(),
			},
		)?;

		let slice = &self.data[self.pos..end];
		self.pos = end;
		Ok(slice)
	}

	/// Copies the next `n` bytes into a new vector.
	pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, OutOfBounds> {
		self.read_slice(n).map(<[u8]>::to_vec)
	}

	/// Reads a fixed-size byte array.
	pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], OutOfBounds> {
		let mut out = [0u8; N];
		out.copy_from_slice(self.read_slice(N)?);
		Ok(out)
	}

	/// Reads an unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8, OutOfBounds> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Reads a little-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16, OutOfBounds> {
		self.read_array().map(u16::from_le_bytes)
	}

	/// Reads a little-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32, OutOfBounds> {
		self.read_array().map(u32::from_le_bytes)
	}

	/// Reads a little-endian `i16`.
	pub fn read_i16(&mut self) -> Result<i16, OutOfBounds> {
		self.read_array().map(i16::from_le_bytes)
	}

	/// Reads a little-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32, OutOfBounds> {
		self.read_array().map(i32::from_le_bytes)
	}

	/// Splits off a cursor over the next `n` bytes and advances this cursor past them.
	///
	/// The returned cursor starts at position 0 and cannot read outside its window.
	pub fn sub_view(&mut self, n: usize) -> Result<ByteCursor<'a>, OutOfBounds> {
		self.read_slice(n).map(ByteCursor::new)
	}

	/// Returns a cursor over `len` bytes starting at absolute `offset`, leaving this
	/// cursor untouched.
	pub fn view_at(&self, offset: usize, len: usize) -> Result<ByteCursor<'a>, OutOfBounds> {
		let mut cursor = *self;
		cursor.seek(SeekFrom::Start(offset as u64))?;
		cursor.sub_view(len)
	}

	/// Moves the read position. Seeking exactly to the end is allowed.
	///
	/// Returns the new absolute position.
	pub fn seek(&mut self, pos: SeekFrom) -> Result<usize, OutOfBounds> {
		let len = self.data.len() as i128;
		let target = match pos {
			SeekFrom::Start(offset) => i128::from(offset),
			SeekFrom::Current(delta) => self.pos as i128 + i128::from(delta),
			SeekFrom::End(delta) => len + i128::from(delta),
		};

		if !(0..=len).contains(&target) {
			return Err(OutOfBounds::Seek {
				target: i64::try_from(target).unwrap_or(i64::MAX),
				len: self.data.len(),
			});
		}

		self.pos = target as usize;
		Ok(self.pos)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_read_integers() {
		let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0xFF, 0xFF];
		let mut cursor = ByteCursor::new(&data);

		assert_eq!(cursor.read_u8().unwrap(), 0x01);
		assert_eq!(cursor.read_u16().unwrap(), 0x0302);
		assert_eq!(cursor.read_u32().unwrap(), 0x0706_0504);
		assert_eq!(cursor.read_i16().unwrap(), -1);
		assert_eq!(cursor.remaining(), 0);
	}

	#[test]
	fn test_read_past_end() {
		let data = [0x01, 0x02, 0x03];
		let mut cursor = ByteCursor::new(&data);
		cursor.read_u16().unwrap();

		let err = cursor.read_u16().unwrap_err();
		assert_eq!(
			err,
			OutOfBounds::Read {
				offset: 2,
				requested: 2,
				len: 3
			}
		);
		assert_eq!(cursor.position(), 2);
	}

	#[test]
	fn test_read_bytes_huge_length() {
		let data = [0u8; 4];
		let mut cursor = ByteCursor::new(&data);
		cursor.read_u8().unwrap();
		assert!(cursor.read_bytes(usize::MAX).is_err());
	}

	#[test]
	fn test_sub_view_is_independent() {
		let data = [1, 2, 3, 4, 5, 6];
		let mut cursor = ByteCursor::new(&data);
		cursor.read_u8().unwrap();

		let mut view = cursor.sub_view(3).unwrap();
		assert_eq!(cursor.position(), 4);
		assert_eq!(view.len(), 3);
		assert_eq!(view.read_bytes(3).unwrap(), vec![2, 3, 4]);
		assert!(view.read_u8().is_err());

		assert_eq!(cursor.read_u8().unwrap(), 5);
	}

	#[test]
	fn test_sub_view_too_long() {
		let data = [1, 2, 3];
		let mut cursor = ByteCursor::new(&data);
		assert!(cursor.sub_view(4).is_err());
		assert_eq!(cursor.position(), 0);
	}

	#[test]
	fn test_view_at() {
		let data = [0, 0, 0, 0xEF, 0xBE, 0xAD, 0xDE];
		let cursor = ByteCursor::new(&data);

		let mut view = cursor.view_at(3, 4).unwrap();
		assert_eq!(view.read_u32().unwrap(), 0xDEAD_BEEF);
		assert_eq!(cursor.position(), 0);

		assert!(cursor.view_at(5, 4).is_err());
		assert!(cursor.view_at(8, 0).is_err());
		assert!(cursor.view_at(7, 0).is_ok());
	}

	#[test]
	fn test_seek_origins() {
		let data = [10, 20, 30, 40];
		let mut cursor = ByteCursor::new(&data);

		assert_eq!(cursor.seek(SeekFrom::Start(2)).unwrap(), 2);
		assert_eq!(cursor.read_u8().unwrap(), 30);
		assert_eq!(cursor.seek(SeekFrom::Current(-3)).unwrap(), 0);
		assert_eq!(cursor.seek(SeekFrom::End(0)).unwrap(), 4);
		assert!(cursor.read_u8().is_err());

		assert_eq!(
			cursor.seek(SeekFrom::Current(1)).unwrap_err(),
			OutOfBounds::Seek {
				target: 5,
				len: 4
			}
		);
		assert!(cursor.seek(SeekFrom::End(-5)).is_err());
		assert_eq!(cursor.position(), 4);
	}
}

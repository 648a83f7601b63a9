use std::mem::size_of;

use bytemuck::Pod;

use super::Pointer;

/// Ordinary host memory. Transfers are plain slice operations.
///
/// Zero-sized elements are counted in bytes and never read or written, since
/// the addresses are no longer aligned once advanced.
impl<T: Pod> Pointer for *mut T {
    type Elem = T;
    type Const = *const T;

    fn null() -> Self {
        std::ptr::null_mut()
    }

    fn is_null(self) -> bool {
        <*mut T>::is_null(self)
    }

    fn as_const(self) -> *const T {
        self
    }

    fn advance(self, count: usize) -> Self {
        if size_of::<T>() == 0 {
            self.cast::<u8>().wrapping_add(count).cast()
        } else {
            self.wrapping_add(count)
        }
    }

    fn distance_from(self, origin: Self) -> isize {
        let size = size_of::<T>().max(1);
        (self as usize).wrapping_sub(origin as usize) as isize / size as isize
    }

    unsafe fn read(self) -> T {
        if size_of::<T>() == 0 {
            return T::zeroed();
        }
        std::ptr::read(self)
    }

    unsafe fn write(self, value: T) {
        if size_of::<T>() != 0 {
            std::ptr::write(self, value);
        }
    }

    unsafe fn copy_from_host(self, src: &[T]) {
        if src.is_empty() || size_of::<T>() == 0 {
            return;
        }
        let dst = std::slice::from_raw_parts_mut(self, src.len());
        crate::copy::copy(src, dst);
    }

    unsafe fn copy_to_host(self, dst: &mut [T]) {
        if dst.is_empty() || size_of::<T>() == 0 {
            return;
        }
        let src = std::slice::from_raw_parts(self as *const T, dst.len());
        crate::copy::copy(src, dst);
    }

    unsafe fn copy_from(self, src: Self, count: usize) {
        if size_of::<T>() == 0 {
            return;
        }
        std::ptr::copy_nonoverlapping(src as *const T, self, count);
    }

    unsafe fn fill(self, count: usize, value: T) {
        if count == 0 || size_of::<T>() == 0 {
            return;
        }
        crate::fill::fill(std::slice::from_raw_parts_mut(self, count), value);
    }
}

#[cfg(test)]
mod tests {
    use crate::ptr::Pointer;

    #[test]
    fn host_pointer() {
        let mut buf = [0u16; 6];
        let p = buf.as_mut_ptr();

        unsafe {
            p.copy_from_host(&[1, 2, 3]);
            p.advance(3).fill(3, 9);
            p.advance(1).write(7);
            assert_eq!(p.advance(2).read(), 3);

            let mut out = [0; 4];
            p.advance(2).copy_to_host(&mut out);
            assert_eq!(out, [3, 9, 9, 9]);

            // inherent raw pointer methods shadow the trait's
            Pointer::copy_from(p, p.advance(3), 2);
        }
        assert_eq!(buf, [9, 9, 3, 9, 9, 9]);
        assert_eq!(p.advance(5).distance_from(p), 5);
        assert!(<*mut u16 as Pointer>::null().is_null());
    }

    #[test]
    fn zero_sized() {
        let p = std::ptr::NonNull::<()>::dangling().as_ptr();
        let end = p.advance(4);
        assert_eq!(end.distance_from(p), 4);
        unsafe {
            Pointer::write(end, ());
            Pointer::read(end);
            end.fill(2, ());
            end.copy_from_host(&[(), ()]);
        }
    }
}

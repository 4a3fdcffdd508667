// ============================================
// Buffer Pool - Переиспользуемые буферы генерации
// ============================================
//
// Принцип "Alloc Once, Reuse Forever": буферы вершин и треугольников
// не освобождаются после загрузки чанка, а возвращаются в пул.
//
// Владение явное: `checkout` отдаёт Vec вызывающему целиком, пока он
// не вернёт его через `give_back`. Пул ограничен по числу буферов.

use std::sync::{Mutex, PoisonError};

/// Ограниченный потокобезопасный список свободных буферов
pub struct BufferPool<T> {
    free: Mutex<Vec<Vec<T>>>,
    capacity: usize,
}

impl<T> BufferPool<T> {
    /// Пул, хранящий не более `capacity` свободных буферов
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Взять пустой буфер ёмкостью не меньше `min_capacity`
    ///
    /// Выбирается наименьший подходящий из возвращённых, иначе
    /// выделяется новый.
    pub fn checkout(&self, min_capacity: usize) -> Vec<T> {
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);

        let best = free
            .iter()
            .enumerate()
            .filter(|(_, buf)| buf.capacity() >= min_capacity)
            .min_by_key(|(_, buf)| buf.capacity())
            .map(|(i, _)| i);

        match best {
            Some(i) => free.swap_remove(i),
            None => Vec::with_capacity(min_capacity),
        }
    }

    /// Вернуть буфер в пул. Содержимое очищается, ёмкость сохраняется.
    ///
    /// Если пул полон, вытесняется самый маленький буфер.
    pub fn give_back(&self, mut buf: Vec<T>) {
        if buf.capacity() == 0 || self.capacity == 0 {
            return;
        }
        buf.clear();

        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.capacity {
            free.push(buf);
            return;
        }

        let smallest = free
            .iter()
            .enumerate()
            .min_by_key(|(_, b)| b.capacity())
            .map(|(i, b)| (i, b.capacity()));
        if let Some((i, cap)) = smallest {
            if cap < buf.capacity() {
                free[i] = buf;
            }
        }
    }

    /// Количество свободных буферов
    pub fn available(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

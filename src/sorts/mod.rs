mod cooperative_sort;
mod onesweep_sort;
mod single_group_sort;

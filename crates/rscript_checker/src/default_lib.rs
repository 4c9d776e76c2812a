//! The declarations loaded by [`crate::Checker::with_default_lib`].

pub(crate) const DEFAULT_LIB_FILE_NAME: &str = "lib.d.ts";

pub(crate) const DEFAULT_LIB: &str = r#"
interface Array<T> {
    length: number;
    push(...items: T[]): number;
    pop(): T | undefined;
    join(separator?: string): string;
    includes(searchElement: T): boolean;
    indexOf(searchElement: T): number;
    slice(start?: number, end?: number): T[];
    filter(predicate: (value: T, index: number) => boolean): T[];
    map<U>(callbackfn: (value: T, index: number) => U): U[];
}

interface Promise<T> {
    then<R>(onfulfilled?: (value: T) => R): Promise<R>;
    catch(onrejected?: (reason: any) => T): Promise<T>;
    finally(onfinally?: () => void): Promise<T>;
}

interface Date {
    getTime(): number;
    toISOString(): string;
    valueOf(): number;
}

type Record<K extends keyof any, T> = { [P in K]: T };
"#;
